//! src/commands/example.rs
//! Print the preset matrix for a size in the `--matrix` text form.

use anyhow::Result;

use crate::config::LabConfig;
use crate::core::matrix::{Matrix, MatrixSize};

pub fn main(size: Option<MatrixSize>, cfg: &LabConfig) -> Result<()> {
    println!("{}", render(size.unwrap_or_else(|| cfg.size())));
    Ok(())
}

/// e.g. `4,2;1,3`, which `--matrix` reads back.
pub fn render(size: MatrixSize) -> String {
    Matrix::example(size)
        .rows()
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_readable_text() {
        assert_eq!(render(MatrixSize::Two), "4,2;1,3");
        assert_eq!(render(MatrixSize::Three), "2,0,0;0,3,4;0,4,9");
        for size in MatrixSize::ALL {
            assert_eq!(Matrix::parse(&render(size)).unwrap(), Matrix::example(size));
        }
    }
}
