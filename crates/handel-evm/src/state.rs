//! Per-frame execution state and the substate a frame hands back

use crate::error::EvmResult;
use crate::gas::GasMeter;
use crate::memory::Memory;
use handel_primitives::{Address, H256};
use primitive_types::U256;
use std::collections::BTreeSet;

/// Log entry emitted by LOG opcodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
    /// Contract address that emitted the log
    pub address: Address,
    /// Log topics (0-4)
    pub topics: Vec<H256>,
    /// Log data
    pub data: Vec<u8>,
}

/// Refund, destroy list and logs accumulated by a frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substate {
    /// Gas refund owed at the end of the transaction
    pub refund: u64,
    /// Accounts scheduled for destruction
    pub destroy_list: BTreeSet<Address>,
    /// Logs in emission order
    pub logs: Vec<LogEntry>,
}

impl Substate {
    /// Fold a successful child frame into this one
    pub fn merge(&mut self, child: Substate) {
        self.refund = self.refund.saturating_add(child.refund);
        self.destroy_list.extend(child.destroy_list);
        self.logs.extend(child.logs);
    }
}

/// Mutable state of one call frame
#[derive(Debug, Clone, Default)]
pub struct EvmState {
    /// Remaining gas
    pub gas: GasMeter,
    /// Position of the next instruction
    pub program_counter: usize,
    /// Frame memory
    pub memory: Memory,
    /// Pending refund
    pub refund: u64,
    /// Accounts scheduled for destruction
    pub destroy_list: BTreeSet<Address>,
    /// Emitted logs
    pub logs: Vec<LogEntry>,
}

impl EvmState {
    /// Fresh frame state holding `gas`
    pub fn new(gas: u64) -> Self {
        Self {
            gas: GasMeter::new(gas),
            ..Default::default()
        }
    }

    /// Gas left in the frame
    pub fn gas_available(&self) -> u64 {
        self.gas.remaining()
    }

    /// Charge gas for touching `offset..offset + length` and grow memory to cover it
    pub fn update_memory_cost(&mut self, offset: U256, length: U256) -> EvmResult<()> {
        let (words, cost) = self.memory.expansion_cost(offset, length)?;
        self.gas.charge(cost)?;
        self.memory.grow(words);
        Ok(())
    }

    /// Move refund, destroy list and logs out of the frame
    pub fn take_substate(&mut self) -> Substate {
        Substate {
            refund: std::mem::take(&mut self.refund),
            destroy_list: std::mem::take(&mut self.destroy_list),
            logs: std::mem::take(&mut self.logs),
        }
    }

    /// Fold a successful child frame into this one
    pub fn merge(&mut self, child: Substate) {
        let mut substate = self.take_substate();
        substate.merge(child);
        self.refund = substate.refund;
        self.destroy_list = substate.destroy_list;
        self.logs = substate.logs;
    }
}
