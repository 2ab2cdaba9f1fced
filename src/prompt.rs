//! Interactive startup prompts on the controlling terminal.

use std::io::{self, BufRead, Write};

use tokio::runtime::{Handle, RuntimeFlavor};

use crate::messages::Messages;
use crate::types::TypeFilter;

fn ask_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "standard input closed while waiting for an answer",
        ));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn ask_required_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<String> {
    loop {
        let answer = ask_from(input, output, prompt)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

fn ask_type_filter_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    messages: &Messages,
) -> io::Result<TypeFilter> {
    loop {
        let answer = ask_from(input, output, messages.prompt_media)?;
        match TypeFilter::from_answer(&answer) {
            Some(filter) => return Ok(filter),
            None => writeln!(output, "{}", messages.invalid_media)?,
        }
    }
}

/// Run a blocking terminal read without stalling a runtime worker.
fn off_runtime<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Read one line; the answer may be empty.
pub fn ask(prompt: &str) -> io::Result<String> {
    off_runtime(|| ask_from(&mut io::stdin().lock(), &mut io::stdout(), prompt))
}

/// Ask until a non-blank answer is given.
pub fn ask_required(prompt: &str) -> io::Result<String> {
    off_runtime(|| ask_required_from(&mut io::stdin().lock(), &mut io::stdout(), prompt))
}

/// Read a password without echoing it.
pub fn ask_secret(prompt: &str) -> io::Result<String> {
    off_runtime(|| rpassword::prompt_password(prompt))
}

/// Ask which media to download, re-asking on unrecognized answers.
pub fn ask_type_filter(messages: &Messages) -> io::Result<TypeFilter> {
    off_runtime(|| ask_type_filter_from(&mut io::stdin().lock(), &mut io::stdout(), messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::GERMAN;
    use std::io::Cursor;

    #[test]
    fn test_ask_strips_line_ending() {
        let mut input = Cursor::new("  123456 \r\n");
        let mut output = Vec::new();
        let answer = ask_from(&mut input, &mut output, "Code: ").unwrap();
        assert_eq!(answer, "  123456 ");
        assert_eq!(output, b"Code: ");
    }

    #[test]
    fn test_ask_eof() {
        let mut input = Cursor::new("");
        let err = ask_from(&mut input, &mut Vec::new(), "Code: ").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_ask_required_skips_blank_lines() {
        let mut input = Cursor::new("\n   \n/srv/backup\n");
        let mut output = Vec::new();
        let answer = ask_required_from(&mut input, &mut output, "Dir: ").unwrap();
        assert_eq!(answer, "/srv/backup");
        assert_eq!(String::from_utf8(output).unwrap(), "Dir: Dir: Dir: ");
    }

    #[test]
    fn test_type_filter_reprompts() {
        let mut input = Cursor::new("audio\nBeide\n");
        let mut output = Vec::new();
        let filter = ask_type_filter_from(&mut input, &mut output, &GERMAN).unwrap();
        assert_eq!(filter, TypeFilter::Both);
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches(GERMAN.prompt_media).count(), 2);
        assert!(shown.contains(GERMAN.invalid_media));
    }

    #[test]
    fn test_type_filter_eof_is_error() {
        let mut input = Cursor::new("x\n");
        assert!(ask_type_filter_from(&mut input, &mut Vec::new(), &GERMAN).is_err());
    }

    #[test]
    fn test_off_runtime_without_runtime() {
        assert_eq!(off_runtime(|| 7), 7);
    }

    #[tokio::test]
    async fn test_off_runtime_on_current_thread_runtime() {
        assert_eq!(off_runtime(|| "answer"), "answer");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_blocking_read_leaves_runtime_running() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::time::{Duration, Instant};

        let ran = Arc::new(AtomicBool::new(false));
        let prompt_task = tokio::spawn({
            let ran = Arc::clone(&ran);
            async move {
                let flag = Arc::clone(&ran);
                tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });
                off_runtime(|| {
                    let deadline = Instant::now() + Duration::from_secs(2);
                    while !ran.load(Ordering::SeqCst) && Instant::now() < deadline {
                        std::thread::sleep(Duration::from_millis(5));
                    }
                    ran.load(Ordering::SeqCst)
                })
            }
        });

        assert!(prompt_task.await.unwrap());
    }
}
