//! Execution environment for EVM

use bytes::Bytes;
use handel_primitives::Address;
use primitive_types::U256;

/// Block environment information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockHeader {
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: u64,
    /// Block difficulty
    pub difficulty: U256,
    /// Block gas limit
    pub gas_limit: u64,
    /// Block beneficiary (COINBASE)
    pub beneficiary: Address,
}

/// Immutable context of one call frame
#[derive(Clone, Debug, Default)]
pub struct ExecutionEnvironment {
    /// Account whose storage and balance the code acts on
    pub code_owner: Address,
    /// Direct caller
    pub caller: Address,
    /// Transaction sender
    pub originator: Address,
    /// Value transferred with the call
    pub value: U256,
    /// Call data
    pub input_data: Bytes,
    /// Code being executed
    pub machine_code: Bytes,
    /// Gas price of the transaction
    pub gas_price: U256,
    /// Block the transaction is executed in
    pub current_block: BlockHeader,
    /// Nesting level, 0 for the outermost frame
    pub call_depth: usize,
}

impl ExecutionEnvironment {
    /// Environment for a frame called from this one.
    ///
    /// The child acts on `code_owner`, sees this frame's owner as caller and
    /// runs one level deeper. Originator, gas price and block are inherited.
    pub fn child(&self, code_owner: Address, value: U256, input_data: Bytes, machine_code: Bytes) -> Self {
        Self {
            code_owner,
            caller: self.code_owner,
            originator: self.originator,
            value,
            input_data,
            machine_code,
            gas_price: self.gas_price,
            current_block: self.current_block.clone(),
            call_depth: self.call_depth + 1,
        }
    }
}
