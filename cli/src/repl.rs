use std::io::{BufRead, Write};

const PROMPT: &str = "raidsim> ";

/// Reads one line from stdin after printing the prompt. `None` on end of input.
pub fn readline() -> Result<Option<String>, String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{PROMPT}").map_err(|e| e.to_string())?;
    stdout.flush().map_err(|e| e.to_string())?;

    let mut buffer = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buffer))
}
