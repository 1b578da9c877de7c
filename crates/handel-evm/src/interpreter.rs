//! EVM bytecode interpreter
//!
//! Each call runs in its own frame. CALL, CALLCODE and CREATE recurse into a
//! fresh frame; its changes to world state and storage are rolled back to a
//! snapshot when it fails.

use crate::env::ExecutionEnvironment;
use crate::error::{EvmError, EvmResult};
use crate::gas::{self, cost, refund};
use crate::opcode::Opcode;
use crate::precompile::PrecompileRegistry;
use crate::spec::ProtocolSpec;
use crate::stack::Stack;
use crate::state::{EvmState, LogEntry, Substate};
use crate::word;
use bytes::Bytes;
use handel_crypto::keccak256;
use handel_primitives::{Address, H256};
use handel_state::{
    BalanceDelta, BlockhashProvider, Snapshot, StorageProvider, WorldStateProvider, MAX_LOOKBACK,
};
use primitive_types::U256;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Positions of JUMPDEST instructions in `code`, skipping PUSH immediates
pub fn jump_destinations(code: &[u8]) -> HashSet<usize> {
    let mut dests = HashSet::new();
    let mut i = 0;

    while i < code.len() {
        let byte = code[i];
        if byte == Opcode::JUMPDEST as u8 {
            dests.insert(i);
        }
        i += 1 + Opcode::from_byte(byte).map_or(0, Opcode::push_size);
    }

    dests
}

/// Address of a contract created by `creator` at `nonce`
pub fn contract_address(creator: &Address, nonce: u64) -> Address {
    let mut stream = rlp::RlpStream::new_list(2);
    stream.append(creator);
    stream.append(&nonce);
    Address::from_word(keccak256(&stream.out()).as_bytes())
}

/// `length` bytes of `data` starting at `offset`, zero-filled past the end
fn padded_slice(data: &[u8], offset: &U256, length: usize) -> Vec<u8> {
    let mut out = vec![0u8; length];
    if let Some(start) = word::to_usize(offset).filter(|start| *start < data.len()) {
        let end = data.len().min(start.saturating_add(length));
        out[..end - start].copy_from_slice(&data[start..end]);
    }
    out
}

/// Interpreter for frames of EVM bytecode
#[derive(Debug, Default)]
pub struct Interpreter {
    precompiles: PrecompileRegistry,
}

impl Interpreter {
    /// Interpreter with the standard precompiles
    pub fn new() -> Self {
        Self::with_precompiles(PrecompileRegistry::standard())
    }

    /// Interpreter with a custom precompile registry
    pub fn with_precompiles(precompiles: PrecompileRegistry) -> Self {
        Self { precompiles }
    }

    /// Precompiles reachable through CALL
    pub fn precompiles(&self) -> &PrecompileRegistry {
        &self.precompiles
    }

    /// Execute `env.machine_code` from the first instruction.
    ///
    /// Gas, memory and the program counter are left in `state` whether the
    /// frame halts normally or fails. On success returns the output and the
    /// substate accumulated by this frame and every successful child.
    pub fn run<B, W, S>(
        &self,
        env: &ExecutionEnvironment,
        state: &mut EvmState,
        blockhash_provider: &B,
        world_state: &mut W,
        storage_provider: &mut S,
        spec: &ProtocolSpec,
    ) -> EvmResult<(Vec<u8>, Substate)>
    where
        B: BlockhashProvider + ?Sized,
        W: WorldStateProvider + ?Sized,
        S: StorageProvider + ?Sized,
    {
        let mut frame = Frame {
            interpreter: self,
            env,
            state,
            stack: Stack::new(),
            jump_dests: jump_destinations(&env.machine_code),
            blockhash_provider,
            world_state,
            storage_provider,
            spec,
        };
        let result = frame.execute();
        if let Err(err) = &result {
            debug!(depth = env.call_depth, owner = %env.code_owner, %err, "frame failed");
        }
        result
    }
}

/// Outcome of a single instruction
enum Step {
    Continue,
    Halt(Vec<u8>),
}

struct Frame<'a, B: ?Sized, W: ?Sized, S: ?Sized> {
    interpreter: &'a Interpreter,
    env: &'a ExecutionEnvironment,
    state: &'a mut EvmState,
    stack: Stack,
    jump_dests: HashSet<usize>,
    blockhash_provider: &'a B,
    world_state: &'a mut W,
    storage_provider: &'a mut S,
    spec: &'a ProtocolSpec,
}

impl<B, W, S> Frame<'_, B, W, S>
where
    B: BlockhashProvider + ?Sized,
    W: WorldStateProvider + ?Sized,
    S: StorageProvider + ?Sized,
{
    fn execute(&mut self) -> EvmResult<(Vec<u8>, Substate)> {
        let env = self.env;
        let code = &env.machine_code[..];
        self.state.program_counter = 0;

        while self.state.program_counter < code.len() {
            let pc = self.state.program_counter;
            let byte = code[pc];
            let opcode = Opcode::from_byte(byte).ok_or(EvmError::InvalidInstruction(byte))?;
            self.state.program_counter += 1;

            trace!(
                depth = env.call_depth,
                pc,
                op = opcode.name(),
                gas = self.state.gas_available(),
                stack = self.stack.len(),
                "step"
            );

            self.state.gas.charge(gas::static_gas(opcode))?;
            if let Step::Halt(output) = self.step(opcode, pc)? {
                return Ok((output, self.state.take_substate()));
            }
        }

        Ok((Vec::new(), self.state.take_substate()))
    }

    fn step(&mut self, opcode: Opcode, pc: usize) -> EvmResult<Step> {
        let env = self.env;
        match opcode {
            Opcode::STOP => return Ok(Step::Halt(Vec::new())),

            // Arithmetic
            Opcode::ADD => self.binary(word::add)?,
            Opcode::MUL => self.binary(word::mul)?,
            Opcode::SUB => self.binary(word::sub)?,
            Opcode::DIV => self.binary(word::div)?,
            Opcode::MOD => self.binary(word::rem)?,
            Opcode::SDIV => {
                let a = self.stack.pop_signed()?;
                let b = self.stack.pop_signed()?;
                self.stack.push_int(word::sdiv(a, b))?;
            }
            Opcode::SMOD => {
                let a = self.stack.pop_signed()?;
                let b = self.stack.pop_signed()?;
                self.stack.push_int(word::smod(a, b))?;
            }
            Opcode::ADDMOD | Opcode::MULMOD => {
                let a = self.stack.pop_unsigned()?;
                let b = self.stack.pop_unsigned()?;
                let n = self.stack.pop_unsigned()?;
                let result = if opcode == Opcode::ADDMOD {
                    word::addmod(a, b, n)
                } else {
                    word::mulmod(a, b, n)
                };
                self.stack.push_int(result)?;
            }
            Opcode::EXP => {
                let base = self.stack.pop_unsigned()?;
                let exponent = self.stack.pop_unsigned()?;
                self.state.gas.charge(gas::exp_cost(&exponent))?;
                self.stack.push_int(word::exp(base, exponent))?;
            }
            Opcode::SIGNEXTEND => self.binary(word::signextend)?,

            // Comparison and bitwise
            Opcode::LT => self.compare(|a, b| a < b)?,
            Opcode::GT => self.compare(|a, b| a > b)?,
            Opcode::SLT => self.compare(|a, b| word::slt(&a, &b))?,
            Opcode::SGT => self.compare(|a, b| word::sgt(&a, &b))?,
            Opcode::EQ => self.compare(|a, b| a == b)?,
            Opcode::ISZERO => {
                let a = self.stack.pop_unsigned()?;
                self.stack.push_bool(a.is_zero())?;
            }
            Opcode::AND => self.binary(|a, b| a & b)?,
            Opcode::OR => self.binary(|a, b| a | b)?,
            Opcode::XOR => self.binary(|a, b| a ^ b)?,
            Opcode::NOT => {
                let a = self.stack.pop_unsigned()?;
                self.stack.push_int(!a)?;
            }
            Opcode::BYTE => self.binary(word::byte)?,

            Opcode::SHA3 => {
                let offset = self.stack.pop_unsigned()?;
                let length = self.stack.pop_unsigned()?;
                let len = word::to_u64(&length).ok_or(EvmError::OutOfGas)?;
                self.state.gas.charge(gas::sha3_word_cost(len)?)?;
                let data = self.load_memory(offset, length)?;
                self.stack.push_bytes(keccak256(&data).as_bytes().to_vec())?;
            }

            // Environment
            Opcode::ADDRESS => self.stack.push_address(&env.code_owner)?,
            Opcode::BALANCE => {
                let address = self.stack.pop_address()?;
                let balance = self.world_state.balance(&address)?;
                self.stack.push_int(balance)?;
            }
            Opcode::ORIGIN => self.stack.push_address(&env.originator)?,
            Opcode::CALLER => self.stack.push_address(&env.caller)?,
            Opcode::CALLVALUE => self.stack.push_int(env.value)?,
            Opcode::CALLDATALOAD => {
                let offset = self.stack.pop_unsigned()?;
                self.stack.push_bytes(padded_slice(&env.input_data, &offset, 32))?;
            }
            Opcode::CALLDATASIZE => self.stack.push_int(U256::from(env.input_data.len()))?,
            Opcode::CALLDATACOPY => self.copy_to_memory(&env.input_data)?,
            Opcode::CODESIZE => self.stack.push_int(U256::from(env.machine_code.len()))?,
            Opcode::CODECOPY => self.copy_to_memory(&env.machine_code)?,
            Opcode::GASPRICE => self.stack.push_int(env.gas_price)?,
            Opcode::EXTCODESIZE => {
                let address = self.stack.pop_address()?;
                let code = self.world_state.code(&address)?;
                self.stack.push_int(U256::from(code.len()))?;
            }
            Opcode::EXTCODECOPY => {
                let address = self.stack.pop_address()?;
                let code = self.world_state.code(&address)?;
                self.copy_to_memory(&code)?;
            }

            // Block
            Opcode::BLOCKHASH => {
                let lookback = self.stack.pop_unsigned()?;
                if lookback.is_zero() || lookback > U256::from(MAX_LOOKBACK) {
                    self.stack.push_int(U256::zero())?;
                } else {
                    let hash = self
                        .blockhash_provider
                        .block_hash(env.current_block.number, lookback.low_u64());
                    self.stack.push_bytes(hash.as_bytes().to_vec())?;
                }
            }
            Opcode::COINBASE => self.stack.push_address(&env.current_block.beneficiary)?,
            Opcode::TIMESTAMP => self.stack.push_int(U256::from(env.current_block.timestamp))?,
            Opcode::NUMBER => self.stack.push_int(U256::from(env.current_block.number))?,
            Opcode::DIFFICULTY => self.stack.push_int(env.current_block.difficulty)?,
            Opcode::GASLIMIT => self.stack.push_int(U256::from(env.current_block.gas_limit))?,

            // Stack, memory, storage and flow
            Opcode::POP => self.stack.drop()?,
            Opcode::MLOAD => {
                let offset = self.stack.pop_unsigned()?;
                let data = self.load_memory(offset, U256::from(32))?;
                self.stack.push_bytes(data)?;
            }
            Opcode::MSTORE => {
                let offset = self.stack.pop_unsigned()?;
                let value = self.stack.pop_word()?;
                let length = U256::from(32);
                self.state.update_memory_cost(offset, length)?;
                let (start, _) = region(&offset, &length);
                self.state.memory.save_word(start, &value);
            }
            Opcode::MSTORE8 => {
                let offset = self.stack.pop_unsigned()?;
                let value = self.stack.pop_unsigned()?;
                self.state.update_memory_cost(offset, U256::one())?;
                let (start, _) = region(&offset, &U256::one());
                self.state.memory.save_byte(start, value.low_u64() as u8);
            }
            Opcode::SLOAD => {
                let index = self.stack.pop_unsigned()?;
                let value = self
                    .storage_provider
                    .get_or_create_storage(&env.code_owner)?
                    .get(&index)?;
                self.stack.push_bytes(value)?;
            }
            Opcode::SSTORE => self.sstore()?,
            Opcode::JUMP => {
                let dest = self.stack.pop_unsigned()?;
                self.jump(dest)?;
            }
            Opcode::JUMPI => {
                let dest = self.stack.pop_unsigned()?;
                let condition = self.stack.pop_unsigned()?;
                if !condition.is_zero() {
                    self.jump(dest)?;
                }
            }
            Opcode::PC => self.stack.push_int(U256::from(pc))?,
            Opcode::MSIZE => self.stack.push_int(U256::from(self.state.memory.size()))?,
            Opcode::GAS => self.stack.push_int(U256::from(self.state.gas_available()))?,
            Opcode::JUMPDEST => {}

            op if op.push_size() > 0 => {
                let size = op.push_size();
                let code = &env.machine_code[..];
                let start = (pc + 1).min(code.len());
                let end = (pc + 1 + size).min(code.len());
                let mut data = code[start..end].to_vec();
                if size > 1 {
                    data.resize(size, 0);
                }
                self.stack.push_bytes(data)?;
                self.state.program_counter = pc + 1 + size;
            }
            op if op.dup_depth() > 0 => self.stack.dup(op.dup_depth())?,
            op if op.swap_depth() > 0 => self.stack.swap(op.swap_depth())?,
            op if op.is_log() => self.log(op.log_topics())?,

            // System
            Opcode::CREATE => self.create()?,
            Opcode::CALL | Opcode::CALLCODE => self.call(opcode)?,
            Opcode::RETURN => {
                let offset = self.stack.pop_unsigned()?;
                let length = self.stack.pop_unsigned()?;
                let output = self.load_memory(offset, length)?;
                return Ok(Step::Halt(output));
            }
            Opcode::SELFDESTRUCT => {
                self.selfdestruct()?;
                return Ok(Step::Halt(Vec::new()));
            }
            _ => return Err(EvmError::InvalidInstruction(opcode as u8)),
        }
        Ok(Step::Continue)
    }

    fn binary(&mut self, f: impl FnOnce(U256, U256) -> U256) -> EvmResult<()> {
        let a = self.stack.pop_unsigned()?;
        let b = self.stack.pop_unsigned()?;
        self.stack.push_int(f(a, b))
    }

    fn compare(&mut self, f: impl FnOnce(U256, U256) -> bool) -> EvmResult<()> {
        let a = self.stack.pop_unsigned()?;
        let b = self.stack.pop_unsigned()?;
        self.stack.push_bool(f(a, b))
    }

    fn jump(&mut self, dest: U256) -> EvmResult<()> {
        match word::to_usize(&dest) {
            Some(target) if self.jump_dests.contains(&target) => {
                self.state.program_counter = target;
                Ok(())
            }
            _ => Err(EvmError::InvalidJumpDestination(dest)),
        }
    }

    /// Charge for `offset..offset + length`, then read it
    fn load_memory(&mut self, offset: U256, length: U256) -> EvmResult<Vec<u8>> {
        self.state.update_memory_cost(offset, length)?;
        let (offset, length) = region(&offset, &length);
        Ok(self.state.memory.load(offset, length))
    }

    /// CALLDATACOPY, CODECOPY and EXTCODECOPY after their source is known
    fn copy_to_memory(&mut self, source: &[u8]) -> EvmResult<()> {
        let dest = self.stack.pop_unsigned()?;
        let src = self.stack.pop_unsigned()?;
        let length = self.stack.pop_unsigned()?;
        let len = word::to_u64(&length).ok_or(EvmError::OutOfGas)?;
        self.state.gas.charge(gas::copy_cost(len)?)?;
        self.state.update_memory_cost(dest, length)?;
        let (dest, len) = region(&dest, &length);
        if len > 0 {
            let data = padded_slice(source, &src, len);
            self.state.memory.save(dest, &data);
        }
        Ok(())
    }

    fn sstore(&mut self) -> EvmResult<()> {
        let owner = self.env.code_owner;
        let index = self.stack.pop_unsigned()?;
        let value = self.stack.pop_unsigned()?;

        let new_root = {
            let mut storage = self.storage_provider.get_or_create_storage(&owner)?;
            let previous = word::from_bytes(&storage.get(&index)?);
            self.state
                .gas
                .charge(gas::sstore_cost(previous.is_zero(), value.is_zero()))?;
            if value.is_zero() && !previous.is_zero() {
                self.state.refund = self.state.refund.saturating_add(refund::SCLEAR);
            }
            if previous == value {
                None
            } else {
                let bytes = if value.is_zero() {
                    vec![0]
                } else {
                    word::to_trimmed_bytes(&value)
                };
                storage.set(index, bytes)?;
                Some(storage.root())
            }
        };

        if let Some(root) = new_root {
            self.world_state.update_storage_root(&owner, root)?;
        }
        Ok(())
    }

    fn log(&mut self, topic_count: usize) -> EvmResult<()> {
        let offset = self.stack.pop_unsigned()?;
        let length = self.stack.pop_unsigned()?;
        let mut topics = Vec::with_capacity(topic_count);
        for _ in 0..topic_count {
            topics.push(H256::from_bytes(self.stack.pop_word()?));
        }

        self.state.update_memory_cost(offset, length)?;
        let (start, len) = region(&offset, &length);
        self.state.gas.charge(gas::log_cost(topic_count, len as u64)?)?;
        let data = self.state.memory.load(start, len);

        self.state.logs.push(LogEntry {
            address: self.env.code_owner,
            topics,
            data,
        });
        Ok(())
    }

    fn restore(&mut self, world: Snapshot, target: &Address, storage: Snapshot) -> EvmResult<()> {
        self.world_state.restore(world)?;
        self.storage_provider.restore(target, storage)?;
        debug!(depth = self.env.call_depth, %target, "state restored");
        Ok(())
    }

    /// Run a child frame against the same collaborators
    fn run_child(&mut self, env: &ExecutionEnvironment, state: &mut EvmState) -> EvmResult<(Vec<u8>, Substate)> {
        self.interpreter.run(
            env,
            state,
            self.blockhash_provider,
            &mut *self.world_state,
            &mut *self.storage_provider,
            self.spec,
        )
    }

    fn call(&mut self, opcode: Opcode) -> EvmResult<()> {
        let env = self.env;
        if env.call_depth >= cost::MAX_CALL_DEPTH {
            return Err(EvmError::CallDepthExceeded);
        }

        let gas_operand = self.stack.pop_unsigned()?;
        let to = self.stack.pop_address()?;
        let value = self.stack.pop_unsigned()?;
        let in_offset = self.stack.pop_unsigned()?;
        let in_length = self.stack.pop_unsigned()?;
        let out_offset = self.stack.pop_unsigned()?;
        let out_length = self.stack.pop_unsigned()?;

        let mut extra = if opcode == Opcode::CALL { cost::CALL } else { cost::CALLCODE };
        if !value.is_zero() {
            extra += cost::CALL_VALUE - cost::CALL_STIPEND;
        }
        self.state.gas.charge(extra)?;

        let input = self.load_memory(in_offset, in_length)?;
        self.state.update_memory_cost(out_offset, out_length)?;
        let (out_start, out_len) = region(&out_offset, &out_length);

        let owner = env.code_owner;
        let target = if opcode == Opcode::CALL { to } else { owner };
        let world_snapshot = self.world_state.take_snapshot();
        let storage_snapshot = self.storage_provider.take_snapshot(&target);

        if !value.is_zero() {
            if self.world_state.balance(&owner)? < value {
                debug!(depth = env.call_depth, %owner, %value, "insufficient balance for call");
                self.state.memory.save(out_start, &vec![0u8; out_len]);
                return self.stack.push_int(U256::zero());
            }
            self.world_state.update_balance(&owner, BalanceDelta::Debit(value))?;
        }

        if self.world_state.account_exists(&target)? {
            self.world_state.update_balance(&target, BalanceDelta::Credit(value))?;
        } else {
            if let Err(err) = self.state.gas.charge(cost::NEW_ACCOUNT) {
                self.restore(world_snapshot, &target, storage_snapshot)?;
                return Err(err);
            }
            self.world_state.create_account(&target, value)?;
        }

        let interpreter = self.interpreter;
        if let Some(contract) = interpreter.precompiles.get(&to) {
            if let Err(err) = self.state.gas.charge(contract.cost(&input)) {
                debug!(depth = env.call_depth, %to, "precompile out of gas");
                self.restore(world_snapshot, &target, storage_snapshot)?;
                return Err(err);
            }
            let output = contract.execute(&input);
            debug!(depth = env.call_depth, %to, output = output.len(), "precompile");
            self.state.memory.save(out_start, &padded_slice(&output, &U256::zero(), out_len));
            return self.stack.push_int(U256::one());
        }

        let gas_cap = match word::to_u64(&gas_operand) {
            Some(cap) if cap <= self.state.gas_available() => cap,
            _ => {
                self.restore(world_snapshot, &target, storage_snapshot)?;
                return Err(EvmError::OutOfGas);
            }
        };
        let call_gas = if value.is_zero() {
            Some(gas_cap)
        } else {
            gas_cap.checked_add(cost::CALL_STIPEND)
        };
        let charged = call_gas
            .ok_or(EvmError::OutOfGas)
            .and_then(|gas| self.state.gas.charge(gas).map(|_| gas));
        let call_gas = match charged {
            Ok(gas) => gas,
            Err(err) => {
                self.restore(world_snapshot, &target, storage_snapshot)?;
                return Err(err);
            }
        };

        let code = self.world_state.code(&to)?;
        let child_env = env.child(target, value, Bytes::from(input), Bytes::from(code));
        let mut child_state = EvmState::new(call_gas);
        debug!(depth = child_env.call_depth, op = opcode.name(), %to, %target, gas = call_gas, "call");

        match self.run_child(&child_env, &mut child_state) {
            Ok((output, substate)) => {
                self.state.gas.refund(child_state.gas_available());
                self.state.merge(substate);
                self.state.memory.save(out_start, &padded_slice(&output, &U256::zero(), out_len));
                debug!(depth = child_env.call_depth, gas_left = child_state.gas_available(), "call succeeded");
                self.stack.push_int(U256::one())
            }
            Err(EvmError::State(err)) => Err(EvmError::State(err)),
            Err(_) => {
                self.restore(world_snapshot, &target, storage_snapshot)?;
                self.stack.push_int(U256::zero())
            }
        }
    }

    fn create(&mut self) -> EvmResult<()> {
        let env = self.env;
        if env.call_depth >= cost::MAX_CALL_DEPTH {
            return Err(EvmError::CallDepthExceeded);
        }

        let value = self.stack.pop_unsigned()?;
        let offset = self.stack.pop_unsigned()?;
        let length = self.stack.pop_unsigned()?;
        let init_code = self.load_memory(offset, length)?;

        let owner = env.code_owner;
        if !self.world_state.account_exists(&owner)? {
            self.world_state.create_account(&owner, U256::zero())?;
        }
        let address = contract_address(&owner, self.world_state.nonce(&owner)?);
        self.world_state.increment_nonce(&owner)?;

        if value > self.world_state.balance(&owner)? {
            debug!(depth = env.call_depth, %owner, %value, "insufficient balance for create");
            return self.stack.push_int(U256::zero());
        }
        self.world_state.update_balance(&owner, BalanceDelta::Debit(value))?;

        if self.world_state.account_exists(&address)? {
            if !self.world_state.is_empty_account(&address)? {
                return Err(EvmError::TransactionCollision);
            }
            self.world_state.update_balance(&address, BalanceDelta::Credit(value))?;
        } else {
            self.world_state.create_account(&address, value)?;
        }

        let world_snapshot = self.world_state.take_snapshot();
        let storage_snapshot = self.storage_provider.take_snapshot(&address);

        let call_gas = self.state.gas_available();
        self.state.gas.charge(call_gas)?;
        let init_code = Bytes::from(init_code);
        let child_env = env.child(address, value, init_code.clone(), init_code);
        let mut child_state = EvmState::new(call_gas);
        debug!(depth = child_env.call_depth, %address, gas = call_gas, "create");

        match self.run_child(&child_env, &mut child_state) {
            Ok((code, substate)) => {
                self.state.gas.refund(child_state.gas_available());
                let deposit = cost::CODE_DEPOSIT.saturating_mul(code.len() as u64);
                if self.spec.code_deposit_check_waived || self.state.gas_available() > deposit {
                    if self.state.gas.charge(deposit).is_err() {
                        debug!(depth = child_env.call_depth, %address, deposit, "code deposit out of gas");
                        self.restore(world_snapshot, &address, storage_snapshot)?;
                        return self.stack.push_int(U256::zero());
                    }
                    let code_hash = self.world_state.update_code(&code)?;
                    self.world_state.update_code_hash(&address, code_hash)?;
                } else {
                    debug!(depth = child_env.call_depth, %address, deposit, "code deposit skipped");
                }
                self.state.merge(substate);
                self.stack.push_address(&address)
            }
            Err(EvmError::State(err)) => Err(EvmError::State(err)),
            Err(_) => {
                self.restore(world_snapshot, &address, storage_snapshot)?;
                self.stack.push_int(U256::zero())
            }
        }
    }

    fn selfdestruct(&mut self) -> EvmResult<()> {
        self.state.gas.charge(self.spec.self_destruct_cost)?;
        let beneficiary = self.stack.pop_address()?;
        let owner = self.env.code_owner;

        if self.state.destroy_list.insert(owner) {
            self.state.refund = self.state.refund.saturating_add(refund::DESTROY);
        }

        let balance = self.world_state.balance(&owner)?;
        if self.world_state.account_exists(&beneficiary)? {
            self.world_state
                .update_balance(&beneficiary, BalanceDelta::Credit(balance))?;
        } else {
            if self.spec.selfdestruct_new_account_charge {
                self.state.gas.charge(cost::NEW_ACCOUNT)?;
            }
            self.world_state.create_account(&beneficiary, balance)?;
        }
        // beneficiary may be the owner itself
        let remaining = self.world_state.balance(&owner)?;
        self.world_state.update_balance(&owner, BalanceDelta::Debit(remaining))?;

        debug!(depth = self.env.call_depth, %owner, %beneficiary, %balance, "selfdestruct");
        Ok(())
    }
}

/// Memory region as `(offset, length)` once its cost has been paid.
///
/// A zero length never touches memory, so its offset is irrelevant.
fn region(offset: &U256, length: &U256) -> (usize, usize) {
    if length.is_zero() {
        (0, 0)
    } else {
        (offset.low_u64() as usize, length.low_u64() as usize)
    }
}
