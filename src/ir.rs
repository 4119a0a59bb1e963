//! Intermediate representation: basic blocks and the table that owns them.
//!
//! Blocks refer to each other through [`BlockId`] handles, which index into
//! the [`BlockTable`] of the compilation unit.

use std::{
    collections::HashMap,
    fmt,
    hash::{BuildHasherDefault, Hasher},
    rc::Rc,
};

use tracing::trace;

/// A handle to a block in a [`BlockTable`]. Ids are handed out in creation
/// order, starting at zero.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u32);

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

/// Straight-line (non terminating) instructions.
///
/// No construct lowers into one yet; blocks currently consist of their
/// terminator only.
#[allow(clippy::empty_enum)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {}

impl fmt::Display for Instruction {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

/// The instruction that ends a block and decides where control goes next.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Terminator {
    /// Leaves the function. `value` tells whether a value is returned.
    Return { value: bool },
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Return { .. } => f.write_str("ret"),
        }
    }
}

#[derive(Debug)]
pub struct BasicBlock {
    id: BlockId,
    name: Rc<str>,
    instructions: Vec<Instruction>,
    terminator: Option<Terminator>,
    successor: Option<BlockId>,
}

impl BasicBlock {
    fn new(id: BlockId, name: Rc<str>) -> BasicBlock {
        BasicBlock {
            id,
            name,
            instructions: Vec::new(),
            terminator: None,
            successor: None,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn terminator(&self) -> Option<Terminator> {
        self.terminator
    }

    /// The block control falls through to in the control flow graph.
    pub fn successor(&self) -> Option<BlockId> {
        self.successor
    }

    /// Sets the terminator of this block, returning the one it replaced.
    ///
    /// A block has a single terminator; replacing one is allowed, but callers
    /// are expected to report it.
    pub fn set_terminator(&mut self, terminator: Terminator) -> Option<Terminator> {
        self.terminator.replace(terminator)
    }
}

/// Owns every basic block of a compilation unit, deduplicated by name.
#[derive(Debug, Default)]
pub struct BlockTable {
    map: HashMap<Rc<str>, BlockId, BuildHasherDefault<BlockNameHasher>>,
    blocks: Vec<BasicBlock>,
}

impl BlockTable {
    pub fn new() -> BlockTable {
        BlockTable::default()
    }

    pub fn with_capacity(capacity: usize) -> BlockTable {
        BlockTable {
            map: HashMap::with_capacity_and_hasher(capacity, BuildHasherDefault::default()),
            blocks: Vec::with_capacity(capacity),
        }
    }

    /// Returns the block named `name`, creating it if it doesn't exist yet.
    pub fn find_or_create(&mut self, name: &str) -> BlockId {
        if let Some(&id) = self.map.get(name) {
            return id;
        }
        let id = BlockId(u32::try_from(self.blocks.len()).expect("too many basic blocks"));
        let name: Rc<str> = Rc::from(name);
        self.map.insert(Rc::clone(&name), id);
        self.blocks.push(BasicBlock::new(id, name));
        trace!(?id, name = self.blocks[id.index()].name(), "created basic block");
        id
    }

    /// Returns the block named `name`, if any.
    pub fn find(&self, name: &str) -> Option<BlockId> {
        self.map.get(name).copied()
    }

    pub fn get(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    pub fn get_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.index()]
    }

    /// Makes `to` the control flow successor of `from`.
    pub fn link(&mut self, from: BlockId, to: BlockId) {
        self.get_mut(from).successor = Some(to);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over the blocks in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter()
    }
}

/// Polynomial string hash, `h = c + 17 * h` over every written byte, kept in
/// 64 bits. `str` keys also write a trailing `0xff` byte.
///
/// `finish` multiplies the state by a 64-bit odd constant so that the high
/// bits, which the map uses as per-slot tags, vary even for short names.
#[derive(Default)]
pub struct BlockNameHasher(u64);

const SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

impl Hasher for BlockNameHasher {
    fn finish(&self) -> u64 {
        self.0.wrapping_mul(SPREAD)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = u64::from(byte).wrapping_add(self.0.wrapping_mul(17));
        }
    }
}
