use std::collections::BTreeSet;

use crate::bytecode::decode::decode;
use crate::bytecode::op::{Instruction, Mode};
use crate::runtime::memory::Memory;

/// One row of a disassembly listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Instruction {
        address: usize,
        instruction: Instruction,
    },
    /// A word that does not decode as an instruction.
    Data { address: usize, value: i64 },
}

impl Line {
    pub fn address(&self) -> usize {
        match self {
            Line::Instruction { address, .. } | Line::Data { address, .. } => *address,
        }
    }
}

/// Linear-sweep disassembly of `memory`.
///
/// Intcode does not separate code from data, so this is a best effort:
/// anything that decodes is shown as an instruction. The sweep stops at the
/// last non-zero word, which skips the zeroed scratch area.
pub fn disassemble(memory: &Memory) -> Vec<Line> {
    let cells = memory.as_slice();
    let end = cells.iter().rposition(|&c| c != 0).map_or(0, |i| i + 1);

    let mut lines = Vec::new();
    let mut address = 0;

    while address < end {
        match decode(memory, address) {
            Ok(instruction) => {
                lines.push(Line::Instruction {
                    address,
                    instruction,
                });
                address += instruction.width();
            }
            Err(_) => {
                lines.push(Line::Data {
                    address,
                    value: cells[address],
                });
                address += 1;
            }
        }
    }

    lines
}

/// Literal destination of a jump, if the target is in immediate mode.
fn jump_target(instruction: &Instruction) -> Option<i64> {
    if !instruction.opcode.is_jump() {
        return None;
    }
    let target = instruction.param(1);
    (target.mode == Mode::Immediate).then_some(target.value)
}

fn collect_jump_targets(lines: &[Line]) -> BTreeSet<usize> {
    lines
        .iter()
        .filter_map(|line| match line {
            Line::Instruction { instruction, .. } => jump_target(instruction),
            Line::Data { .. } => None,
        })
        .filter_map(|target| usize::try_from(target).ok())
        .collect()
}

/// Render a listing, one line per row, marking jump targets with `►`.
pub fn render(lines: &[Line]) -> String {
    let targets = collect_jump_targets(lines);
    let mut out = String::new();

    for line in lines {
        let address = line.address();
        let marker = if targets.contains(&address) { "► " } else { "  " };

        let row = match line {
            Line::Instruction { instruction, .. } => match jump_target(instruction) {
                Some(target) => {
                    let direction = if target < address as i64 { "↑" } else { "↓" };
                    format!(
                        "{:04} {}{}  {} (→ {:04})",
                        address, marker, instruction, direction, target
                    )
                }
                None => format!("{:04} {}{}", address, marker, instruction),
            },
            Line::Data { value, .. } => format!("{:04} {}DATA {}", address, marker, value),
        };
        out.push_str(&row);
        out.push('\n');
    }

    out
}

/// Print a listing of `memory` to stdout.
pub fn print_listing(memory: &Memory) {
    let lines = disassemble(memory);
    println!("════════════════════════════════════════");
    println!(" {} words, {} rows", memory.len(), lines.len());
    println!("════════════════════════════════════════");
    print!("{}", render(&lines));
}
