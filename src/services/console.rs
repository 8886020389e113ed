use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::kernel::collaborators::Console;

/// stdout for output, line-buffered stdin for typed commands.
pub struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Console for StdConsole {
    fn print(&mut self, line: &str) {
        println!("{}", line);
    }

    async fn read_line(&mut self, label: &str) -> Option<String> {
        print!("{}", label);
        let _ = std::io::stdout().flush();
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read console input: {}", e);
                None
            }
        }
    }
}
