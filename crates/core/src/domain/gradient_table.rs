// Gradient table fixtures (b-values / b-vectors)
// Text layout follows numpy savetxt/loadtxt so fixtures interoperate with the pipeline

use crate::error::{Result, RunnerError};

/// Paired b-values and b-vectors of a diffusion acquisition
#[derive(Debug, Clone, PartialEq)]
pub struct GradientTable {
    bvals: Vec<f64>,
    bvecs: Vec<[f64; 3]>,
}

impl GradientTable {
    /// Create a gradient table
    ///
    /// # Errors
    /// - RunnerError::InvalidArgument if the two sequences differ in length
    pub fn new(bvals: Vec<f64>, bvecs: Vec<[f64; 3]>) -> Result<Self> {
        if bvals.len() != bvecs.len() {
            return Err(RunnerError::InvalidArgument(format!(
                "{} b-values but {} b-vectors",
                bvals.len(),
                bvecs.len()
            )));
        }
        Ok(Self { bvals, bvecs })
    }

    pub fn bvals(&self) -> &[f64] {
        &self.bvals
    }

    pub fn bvecs(&self) -> &[[f64; 3]] {
        &self.bvecs
    }

    pub fn len(&self) -> usize {
        self.bvals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bvals.is_empty()
    }

    /// Two-shell acquisition built from a single shell
    ///
    /// b-values are followed by their doubles, b-vectors are repeated.
    pub fn two_shell(&self) -> Self {
        let bvals = self
            .bvals
            .iter()
            .copied()
            .chain(self.bvals.iter().map(|b| b * 2.0))
            .collect();
        let bvecs = self.bvecs.iter().chain(self.bvecs.iter()).copied().collect();
        Self { bvals, bvecs }
    }

    /// One b-value per line
    pub fn format_bvals(&self) -> String {
        self.bvals
            .iter()
            .map(|b| format!("{}\n", format_value(*b)))
            .collect()
    }

    /// One b-vector per line, components separated by a space
    pub fn format_bvecs(&self) -> String {
        self.bvecs
            .iter()
            .map(|v| {
                format!(
                    "{} {} {}\n",
                    format_value(v[0]),
                    format_value(v[1]),
                    format_value(v[2])
                )
            })
            .collect()
    }

    /// Parse b-value and b-vector text and pair them
    pub fn parse(bval_text: &str, bvec_text: &str) -> Result<Self> {
        Self::new(parse_bvals(bval_text)?, parse_bvecs(bvec_text)?)
    }
}

/// `%.18e` as written by numpy (`1.000000000000000000e+03`)
fn format_value(value: f64) -> String {
    let formatted = format!("{:.18e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

/// Numeric rows of a whitespace-delimited text file; blank lines and `#` comments skipped
fn parse_rows(text: &str) -> Result<Vec<Vec<f64>>> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.split(|c: char| c.is_whitespace() || c == ',')
                .filter(|tok| !tok.is_empty())
                .map(|tok| {
                    tok.parse::<f64>().map_err(|e| {
                        RunnerError::InvalidArgument(format!("Invalid number '{}': {}", tok, e))
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect()
}

/// Parse b-values written either one per line or as a single row
pub fn parse_bvals(text: &str) -> Result<Vec<f64>> {
    Ok(parse_rows(text)?.into_iter().flatten().collect())
}

/// Parse b-vectors in row layout (N x 3) or FSL column layout (3 x N)
pub fn parse_bvecs(text: &str) -> Result<Vec<[f64; 3]>> {
    let rows = parse_rows(text)?;

    if rows.iter().all(|row| row.len() == 3) {
        return Ok(rows.into_iter().map(|r| [r[0], r[1], r[2]]).collect());
    }

    if rows.len() == 3 && rows[0].len() == rows[1].len() && rows[1].len() == rows[2].len() {
        return Ok((0..rows[0].len())
            .map(|i| [rows[0][i], rows[1][i], rows[2][i]])
            .collect());
    }

    Err(RunnerError::InvalidArgument(
        "b-vectors must be N x 3 or 3 x N".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_shell() -> GradientTable {
        GradientTable::new(
            vec![0.0, 1000.0, 1000.0],
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = GradientTable::new(vec![0.0, 1000.0], vec![[1.0, 0.0, 0.0]]);
        assert!(matches!(result, Err(RunnerError::InvalidArgument(_))));
    }

    #[test]
    fn test_two_shell() {
        let table = single_shell().two_shell();

        assert_eq!(table.len(), 6);
        assert_eq!(table.bvals(), &[0.0, 1000.0, 1000.0, 0.0, 2000.0, 2000.0]);
        assert_eq!(table.bvecs()[4], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_numpy_savetxt_format() {
        assert_eq!(format_value(1000.0), "1.000000000000000000e+03");
        assert_eq!(format_value(0.0), "0.000000000000000000e+00");
        assert_eq!(format_value(-0.5), "-5.000000000000000000e-01");

        let text = single_shell().format_bvecs();
        let first = text.lines().nth(1).unwrap();
        assert_eq!(
            first,
            "1.000000000000000000e+00 0.000000000000000000e+00 0.000000000000000000e+00"
        );
    }

    #[test]
    fn test_parse_written_text() {
        let table = single_shell();
        let parsed = GradientTable::parse(&table.format_bvals(), &table.format_bvecs()).unwrap();
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_parse_fsl_column_layout() {
        let bvecs = parse_bvecs("0 1 0 0\n0 0 1 0\n0 0 0 1\n").unwrap();
        assert_eq!(bvecs.len(), 4);
        assert_eq!(bvecs[3], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let bvals = parse_bvals("# shell\n0\n\n1000 # b=1000\n").unwrap();
        assert_eq!(bvals, vec![0.0, 1000.0]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_bvals("0\nabc\n").is_err());
        assert!(parse_bvecs("1 0\n0 1\n").is_err());
    }
}
