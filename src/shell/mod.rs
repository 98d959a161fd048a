//! Interactive lab: edit one matrix, calculate, inspect the derivation.
//!
//! Rows and columns are 1-based at the prompt.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::debug;

use crate::config::LabConfig;
use crate::core::eigen::NalgebraSolver;
use crate::core::matrix::{Matrix, MatrixSize};
use crate::core::report::{self, matrix_lines, ReportOptions};
use crate::core::session::{Lab, LabState};
use crate::io::atomic::atomic_write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    lab: Lab,
    opts: ReportOptions,
    solver: NalgebraSolver,
}

pub fn start(cfg: &LabConfig) -> Result<()> {
    let mut shell = Shell::new(cfg);
    if cfg.color {
        banner();
    }
    let stdin = io::stdin();
    let stdout = io::stdout();
    shell.run(stdin.lock(), stdout.lock(), true)
}

impl Shell {
    pub fn new(cfg: &LabConfig) -> Self {
        Self {
            lab: Lab::new(cfg.size()),
            opts: cfg.report_options(),
            solver: NalgebraSolver::default(),
        }
    }

    pub fn lab(&self) -> &Lab {
        &self.lab
    }

    /// Read commands until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W, prompt: bool) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(out, "{} ", self.prompt())?;
                out.flush().ok();
            }
            let Some(line) = lines.next() else {
                if prompt {
                    writeln!(out)?;
                }
                break;
            };
            let line = line?;
            let parts = shell_words(line.trim());
            let Some((cmd, args)) = parts.split_first() else {
                continue;
            };
            debug!(cmd = %cmd, "shell command");
            match self.execute(cmd, args, &mut out) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "{} {e:#}", self.paint_err("err:"))?,
            }
        }
        Ok(())
    }

    fn execute<W: Write>(&mut self, cmd: &str, args: &[String], out: &mut W) -> Result<Flow> {
        match cmd {
            "help" | "?" => write!(out, "{}", self.help())?,
            "exit" | "quit" => return Ok(Flow::Exit),

            "size" => {
                let Some(n) = args.first() else { bail!("usage: size <2|3|4>") };
                let size: MatrixSize = n.parse()?;
                self.lab.resize(size);
                self.show_matrix(out)?;
            }
            "set" => {
                let [r, c, value] = args else { bail!("usage: set <row> <col> <value>") };
                let (row, col) = (index(r)?, index(c)?);
                self.lab.set_cell(row, col, value)?;
                self.show_matrix(out)?;
            }
            "row" => {
                let Some((r, values)) = args.split_first() else { bail!("usage: row <row> <v1> <v2> ..") };
                let row = index(r)?;
                if values.len() > self.lab.size().dim() {
                    bail!("row has {} values but the matrix is {}", values.len(), self.lab.size());
                }
                for (col, v) in values.iter().enumerate() {
                    self.lab.set_cell(row, col, v)?;
                }
                self.show_matrix(out)?;
            }
            "matrix" => {
                if args.is_empty() {
                    bail!("usage: matrix <rows separated by ';'>");
                }
                self.lab.replace(Matrix::parse(&args.join(" "))?);
                self.show_matrix(out)?;
            }
            "example" => {
                self.lab.load_example();
                writeln!(out, "Example matrix loaded")?;
                self.show_matrix(out)?;
            }
            "clear" | "reset" => {
                self.lab.reset();
                writeln!(out, "Matrix cleared")?;
                self.show_matrix(out)?;
            }
            "show" => {
                self.show_matrix(out)?;
                self.show_state(out)?;
            }
            "calc" => {
                self.lab.calculate(&self.solver);
                self.show_state(out)?;
            }
            "steps" => {
                let result = self.ready()?;
                write!(out, "{}", report::render_steps(self.lab.matrix(), result, &self.opts)?)?;
            }
            "json" => {
                let result = self.ready()?;
                let report = report::json_report(self.lab.matrix(), result, &self.opts)?;
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            }
            "save" => {
                let Some(path) = args.first().map(PathBuf::from) else { bail!("usage: save <file>") };
                let result = self.ready()?;
                let mut plain = self.opts;
                plain.color = false;
                plain.steps = true;
                let text = report::render_text(self.lab.matrix(), result, &plain)?;
                atomic_write(&path, text.as_bytes()).with_context(|| format!("writing {}", path.display()))?;
                writeln!(out, "wrote {}", path.display())?;
            }
            other => bail!("unknown command: {other} (try 'help')"),
        }
        Ok(Flow::Continue)
    }

    fn ready(&self) -> Result<&crate::core::eigen::EigenResult> {
        match self.lab.state() {
            LabState::Ready(r) => Ok(r),
            LabState::Failed(e) => bail!("last calculation failed: {e}"),
            _ => bail!("nothing calculated yet; run 'calc' first"),
        }
    }

    fn show_matrix<W: Write>(&self, out: &mut W) -> Result<()> {
        let fmt = self.opts.result_format;
        let cells = self
            .lab
            .matrix()
            .rows()
            .into_iter()
            .map(|row| row.into_iter().map(|v| fmt.real(v)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        writeln!(out, "Matrix A ({})", self.lab.size())?;
        for line in matrix_lines(&cells) {
            writeln!(out, "  {line}")?;
        }
        Ok(())
    }

    fn show_state<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.lab.state() {
            LabState::Idle | LabState::Calculating => {
                writeln!(out, "Enter your matrix values and run 'calc' to see eigenvalues and eigenvectors")?;
            }
            LabState::Ready(result) => {
                writeln!(out, "Calculation complete! Found {} eigenvalue(s)", result.len())?;
                write!(out, "{}", report::render_result(result, &self.opts)?)?;
            }
            LabState::Failed(e) => {
                writeln!(out, "{} {e}", self.paint_err("Calculation failed:"))?;
            }
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        let tag = format!("⟦λ {}⟧", self.lab.size());
        if self.opts.color {
            format!("{} {}", tag.bold().truecolor(225, 0, 180), "›".truecolor(255, 240, 0))
        } else {
            format!("{tag} ›")
        }
    }

    fn paint_err(&self, s: &str) -> String {
        if self.opts.color { s.red().bold().to_string() } else { s.to_string() }
    }

    fn help(&self) -> String {
        let title = |s: &str| if self.opts.color { s.truecolor(130, 0, 200).to_string() } else { s.to_string() };
        format!(
            "{}\n  size <2|3|4>          # new zero matrix of that size\n  set <row> <col> <v>   # edit one cell (1-based)\n  row <row> <v1> ..     # edit a whole row\n  matrix <text>         # replace matrix, e.g. matrix 4,2;1,3\n  example               # load the preset for this size\n  clear                 # zero the matrix\n  show                  # print matrix and last result\n\
             {}\n  calc                  # compute eigenvalues and eigenvectors\n  steps                 # step-by-step derivation\n  json                  # last result as JSON\n  save <file>           # write result + steps to a file\n\
             {}\n  help                  # show this help\n  exit                  # quit\n",
            title("Matrix:"),
            title("Results:"),
            title("Shell:"),
        )
    }
}

/// 1-based prompt index to 0-based.
fn index(s: &str) -> Result<usize> {
    let i: usize = s.parse().with_context(|| format!("'{s}' is not a row/column number"))?;
    i.checked_sub(1).context("rows and columns start at 1")
}

fn banner() {
    println!(
        "\n{}  \n{}  ",
        "╔══════════════════════════════════════════════════╗".truecolor(225, 0, 180),
        "║        E i g e n   V a l u e   L a b             ║"
            .truecolor(255, 240, 0)
            .bold(),
    );
    println!(
        "{}  {}",
        "╚══════════════════════════════════════════════════╝".truecolor(225, 0, 180),
        "type 'help' for commands".truecolor(130, 0, 200)
    );
}

/// Whitespace-separated words; `"..."` keeps spaces inside one word.
fn shell_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word: Option<String> = None;
    let mut quoted = false;
    for ch in line.chars() {
        if ch == '"' {
            quoted = !quoted;
            // `""` is still a word
            word.get_or_insert_with(String::new);
        } else if ch.is_whitespace() && !quoted {
            words.extend(word.take());
        } else {
            word.get_or_insert_with(String::new).push(ch);
        }
    }
    words.extend(word);
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> LabConfig {
        LabConfig { color: false, ..LabConfig::default() }
    }

    fn drive(script: &str) -> (Shell, String) {
        let mut shell = Shell::new(&plain());
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out, false).unwrap();
        (shell, String::from_utf8(out).unwrap())
    }

    #[test]
    fn words_respect_quotes() {
        assert_eq!(shell_words(r#"matrix "4 2; 1 3""#), vec!["matrix", "4 2; 1 3"]);
        assert_eq!(shell_words(r#"  set 1  2 """#), vec!["set", "1", "2", ""]);
    }

    #[test]
    fn show_uses_configured_decimals() {
        let cfg = LabConfig { color: false, result_decimals: 2, ..LabConfig::default() };
        let mut shell = Shell::new(&cfg);
        let mut out = Vec::new();
        shell.run("size 2\nset 1 1 3.14159\n".as_bytes(), &mut out, false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[ 3.14  0 ]"), "{text}");
        assert!(!text.contains("3.14159"));
    }

    #[test]
    fn example_then_calc() {
        let (shell, out) = drive("size 2\nexample\ncalc\n");
        assert!(out.contains("Found 2 eigenvalue(s)"));
        assert!(out.contains("λ1 = 2"));
        assert!(out.contains("λ2 = 5"));
        assert!(shell.lab().result().is_some());
    }

    #[test]
    fn edits_clear_result() {
        let (shell, _) = drive("example\ncalc\nset 1 1 7\n");
        assert_eq!(shell.lab().state(), &LabState::Idle);
        assert_eq!(shell.lab().matrix().get(0, 0), Some(7.0));
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        let (shell, out) = drive("size 9\nset 0 1 2\nsteps\nbogus\nsize 2\nexit\nsize 4\n");
        assert!(out.contains("err: Unsupported matrix size 9"));
        assert!(out.contains("err: rows and columns start at 1"));
        assert!(out.contains("err: nothing calculated yet"));
        assert!(out.contains("err: unknown command: bogus"));
        assert_eq!(shell.lab().size(), MatrixSize::Two);
    }

    #[test]
    fn row_and_matrix_commands() {
        let (shell, _) = drive("size 2\nrow 2 5 6\n");
        assert_eq!(shell.lab().matrix().rows(), vec![vec![0.0, 0.0], vec![5.0, 6.0]]);
        let (shell, _) = drive("matrix \"1,2,3;4,5,6;7,8,10\"\n");
        assert_eq!(shell.lab().size(), MatrixSize::Three);
    }

    #[test]
    fn save_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.txt");
        let (_, out) = drive(&format!("example\ncalc\nsave \"{}\"\n", path.display()));
        assert!(out.contains("wrote"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("7. Verification"));
    }
}
