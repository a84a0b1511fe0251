use crate::*;

/// Words of addressable memory on the target machine. The stack grows
/// downward from here; global declarations live at `MEMORY_SIZE + offset`.
pub const MEMORY_SIZE: i64 = 10_000;

/// One line of the emitted assembly. Labels render as `name:` and occupy no
/// address once assembled.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Push(i64),
    PushLabel(String),
    Pop,
    Add,
    Sub,
    Mult,
    Div,
    BranchIfEqual(String),
    BranchIfLessEqual(String),
    Branch(String),
    LoadFramePointer,
    StoreFramePointer,
    CopyFramePointer,
    LoadReturnAddress,
    StoreReturnAddress,
    LoadTemporary,
    StoreTemporary,
    LoadWord,
    StoreWord,
    LoadHeapPointer,
    StoreHeapPointer,
    JumpSubroutine,
    Print,
    Halt,
    Label(String),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match self {
            Push(value) => write!(f, "push {}", value),
            PushLabel(label) => write!(f, "push {}", label),
            Pop => write!(f, "pop"),
            Add => write!(f, "add"),
            Sub => write!(f, "sub"),
            Mult => write!(f, "mult"),
            Div => write!(f, "div"),
            BranchIfEqual(label) => write!(f, "beq {}", label),
            BranchIfLessEqual(label) => write!(f, "bleq {}", label),
            Branch(label) => write!(f, "b {}", label),
            LoadFramePointer => write!(f, "lfp"),
            StoreFramePointer => write!(f, "sfp"),
            CopyFramePointer => write!(f, "cfp"),
            LoadReturnAddress => write!(f, "lra"),
            StoreReturnAddress => write!(f, "sra"),
            LoadTemporary => write!(f, "ltm"),
            StoreTemporary => write!(f, "stm"),
            LoadWord => write!(f, "lw"),
            StoreWord => write!(f, "sw"),
            LoadHeapPointer => write!(f, "lhp"),
            StoreHeapPointer => write!(f, "shp"),
            JumpSubroutine => write!(f, "js"),
            Print => write!(f, "print"),
            Halt => write!(f, "halt"),
            Label(label) => write!(f, "{}:", label),
        }
    }
}

#[derive(Clone, Default, PartialEq)]
pub struct Instructions(Vec<Instruction>);

impl Instructions {
    pub fn new() -> Instructions {
        Instructions(vec![])
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.0.push(instruction)
    }

    pub fn extend(&mut self, instructions: Instructions) {
        self.0.extend(instructions.0)
    }

    pub fn iter(&self) -> std::slice::Iter<Instruction> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Instruction> for Instructions {
    fn from(instruction: Instruction) -> Instructions {
        Instructions(vec![instruction])
    }
}

impl From<Vec<Instruction>> for Instructions {
    fn from(instructions: Vec<Instruction>) -> Instructions {
        Instructions(instructions)
    }
}

impl Into<Vec<Instruction>> for Instructions {
    fn into(self) -> Vec<Instruction> {
        self.0
    }
}

impl AsRef<Vec<Instruction>> for Instructions {
    fn as_ref(&self) -> &Vec<Instruction> {
        &self.0
    }
}

impl IntoIterator for Instructions {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The assembly listing, one instruction or label per line.
impl fmt::Display for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, instruction) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "; Noop")?;
        }
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listings_render_one_instruction_per_line() {
        let mut instructions = Instructions::new();
        instructions.push(Instruction::Push(3));
        instructions.push(Instruction::Push(4));
        instructions.push(Instruction::Add);
        instructions.push(Instruction::Label("end".into()));

        assert_eq!(instructions.to_string(), "push 3\npush 4\nadd\nend:");
    }
}
