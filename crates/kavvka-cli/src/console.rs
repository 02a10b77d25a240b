use colored::*;
use kavvka_core::compare_set::PartitionPlan;
use kavvka_core::paths::{normalize_path_str, to_forward_slashes};
use kavvka_core::Operator;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Operator backed by the terminal. Preset commands (from `--select`) are
/// replayed before anything is read from stdin.
pub struct ConsoleOperator {
    preset: VecDeque<String>,
}

impl ConsoleOperator {
    pub fn new(preset: Vec<String>) -> Self {
        Self {
            preset: preset.into(),
        }
    }
}

impl Operator for ConsoleOperator {
    fn next_command(&mut self, view: &str) -> io::Result<Option<String>> {
        println!("\n{}", view);
        if let Some(command) = self.preset.pop_front() {
            println!("> {}", command);
            return Ok(Some(command));
        }
        print!("> ");
        io::stdout().flush()?;
        read_line()
    }

    fn confirm_moves(&mut self, plan: &PartitionPlan) -> io::Result<bool> {
        println!(
            "\n{} {}",
            "Marked folder:".bold(),
            to_forward_slashes(&plan.chosen_folder).cyan()
        );
        for planned in &plan.moves {
            println!(
                "  {} -> {}",
                to_forward_slashes(&planned.source),
                to_forward_slashes(&planned.target).dimmed()
            );
        }
        prompt_confirm(
            &format!(
                "Move {} folder(s) into {}?",
                plan.moves.len(),
                to_forward_slashes(&plan.compare_folder)
            ),
            Some(true),
        )
    }

    fn notify(&mut self, message: &str) {
        if message.starts_with('❌') {
            println!("{}", message.red());
        } else {
            println!("{}", message.green());
        }
    }
}

/// One line from stdin without its line ending; `None` at end of input.
fn read_line() -> io::Result<Option<String>> {
    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
}

pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    loop {
        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        let Some(input) = read_line()? else {
            return Ok(default.unwrap_or(false));
        };

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}

/// Read paths one per line until an empty line or end of input.
pub fn read_input_paths() -> io::Result<Vec<String>> {
    println!("Enter the paths to process (one per line, empty line to finish):");
    let mut paths = Vec::new();
    while let Some(line) = read_line()? {
        let path = normalize_path_str(&line);
        if path.is_empty() {
            break;
        }
        paths.push(path);
    }
    Ok(paths)
}
