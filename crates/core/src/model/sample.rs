use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SampleParseError {
    #[error("sample has no metric")]
    MissingMetric,
    #[error("invalid metric {0:?}")]
    InvalidMetric(String),
    #[error("negative metric {0}")]
    NegativeMetric(i64),
    #[error("stack does not start with a process (P<pid>)")]
    MissingProcess,
    #[error("stack has no thread (T<tid>) after the process")]
    MissingThread,
    #[error("no valid samples found")]
    Empty,
}

/// A single stack frame of a sample, `<file>:<function>:<line>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFrame {
    /// The token as it appeared in the sample; frames are merged on it.
    pub raw: String,
    pub file: Option<String>,
    pub function: String,
    pub line: Option<u32>,
}

impl SampleFrame {
    /// Split a frame token from the right so module paths containing `:`
    /// (e.g. Windows drive letters) stay intact. Tokens that are not of
    /// the `file:function:line` shape keep their text as the function
    /// name and get no file.
    pub fn parse(token: &str) -> Self {
        let unresolved = || Self {
            raw: token.to_string(),
            file: None,
            function: token.to_string(),
            line: None,
        };

        let Some((rest, line)) = token.rsplit_once(':') else {
            return unresolved();
        };
        let Ok(line) = line.parse::<u32>() else {
            return unresolved();
        };
        let Some((file, function)) = rest.rsplit_once(':') else {
            return unresolved();
        };

        Self {
            raw: token.to_string(),
            file: (!file.is_empty()).then(|| file.to_string()),
            function: function.to_string(),
            line: Some(line),
        }
    }
}

/// One line of Austin's collapsed output:
/// `P<pid>;T<thread>[;<frame>]* <metrics>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Process token including its `P` prefix.
    pub process: String,
    /// Thread token including its `T` prefix.
    pub thread: String,
    pub frames: Vec<SampleFrame>,
    /// First of the comma-separated metrics (time in μs, or memory in KB).
    pub metric: u64,
}

impl Sample {
    pub fn parse(line: &str) -> Result<Self, SampleParseError> {
        let line = line.trim();
        let (stack, metrics) = line
            .rsplit_once(char::is_whitespace)
            .ok_or(SampleParseError::MissingMetric)?;

        let first = metrics.split(',').next().unwrap_or(metrics);
        let metric: i64 = first
            .parse()
            .map_err(|_| SampleParseError::InvalidMetric(first.to_string()))?;
        let metric = u64::try_from(metric).map_err(|_| SampleParseError::NegativeMetric(metric))?;

        let mut parts = stack.trim_end().split(';');
        let process = parts
            .next()
            .filter(|p| p.starts_with('P'))
            .ok_or(SampleParseError::MissingProcess)?;
        let thread = parts
            .next()
            .filter(|t| t.starts_with('T'))
            .ok_or(SampleParseError::MissingThread)?;

        let frames = parts
            .filter(|f| !f.is_empty())
            .map(SampleFrame::parse)
            .collect();

        Ok(Self {
            process: process.to_string(),
            thread: thread.to_string(),
            frames,
            metric,
        })
    }
}
