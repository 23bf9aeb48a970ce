//! Parsed command-line structure
//!
//! One input line compiles to a [`Pipeline`]: an owned, ordered sequence of
//! [`Command`] stages plus a single background flag. Each stage carries its
//! own redirections; the executor wires everything else with pipes.

use std::fmt;

/// File redirections attached to a single pipeline stage.
///
/// At most one of `stdout` and `stdout_append` is ever set; the parser
/// rejects lines that ask for both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirects {
    /// `< file`: read standard input from a file
    pub stdin: Option<String>,
    /// `> file`: write standard output to a file, truncating
    pub stdout: Option<String>,
    /// `>> file`: write standard output to a file, appending
    pub stdout_append: Option<String>,
}

impl Redirects {
    /// Whether any stdout-family redirect is present.
    pub fn has_stdout(&self) -> bool {
        self.stdout.is_some() || self.stdout_append.is_some()
    }
}

/// One stage of a pipeline: a command name, its arguments, and redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    /// Arguments, excluding the name itself
    pub args: Vec<String>,
    pub redirects: Redirects,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Command {
            name: name.into(),
            args: Vec::new(),
            redirects: Redirects::default(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some(path) = &self.redirects.stdin {
            write!(f, " < {}", path)?;
        }
        if let Some(path) = &self.redirects.stdout {
            write!(f, " > {}", path)?;
        }
        if let Some(path) = &self.redirects.stdout_append {
            write!(f, " >> {}", path)?;
        }
        Ok(())
    }
}

/// A full parsed line: one or more stages, optionally backgrounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    /// The stages in execution order; never empty
    pub stages: Vec<Command>,
    /// Whether the whole pipeline runs detached (trailing `&`)
    pub background: bool,
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", stage)?;
        }
        if self.background {
            write!(f, " &")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_round_trips_a_line() {
        let pipeline = Pipeline {
            stages: vec![
                Command {
                    name: "sort".to_string(),
                    args: vec![],
                    redirects: Redirects {
                        stdin: Some("in.txt".to_string()),
                        ..Redirects::default()
                    },
                },
                Command {
                    name: "head".to_string(),
                    args: vec!["-2".to_string()],
                    redirects: Redirects {
                        stdout: Some("out.txt".to_string()),
                        ..Redirects::default()
                    },
                },
            ],
            background: true,
        };
        assert_eq!(
            pipeline.to_string(),
            "sort < in.txt | head -2 > out.txt &"
        );
    }
}
