//! Host programs.
//!
//! The host backend has no compiler. Building a program performs the
//! checks a front end would reject first (malformed options, unbalanced
//! brackets, unterminated comments or literals, no kernels) and collects
//! the kernel names.

use crate::error::{Error as OclError, Result as OclResult};
use crate::standard::Program;


#[derive(Clone, Debug, PartialEq)]
enum Token {
    Ident(String),
    Punct(char),
}

/// Splits source text into identifiers and punctuation, dropping comments,
/// string and character literals, numbers and whitespace. Each token carries
/// its line number.
fn tokenize(src: &str) -> Result<Vec<(Token, usize)>, String> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => { line += 1; i += 1; },
            '/' if chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' { i += 1; }
            },
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start = line;
                i += 2;
                loop {
                    match chars.get(i) {
                        None => return Err(format!("{}: unterminated comment", start)),
                        Some('*') if chars.get(i + 1) == Some(&'/') => { i += 2; break; },
                        Some('\n') => { line += 1; i += 1; },
                        Some(_) => i += 1,
                    }
                }
            },
            '"' | '\'' => {
                let start = line;
                i += 1;
                loop {
                    match chars.get(i) {
                        None | Some('\n') => {
                            return Err(format!("{}: missing terminating {} character", start, c));
                        },
                        Some('\\') => i += 2,
                        Some(&q) if q == c => { i += 1; break; },
                        Some(_) => i += 1,
                    }
                }
            },
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') { i += 1; }
                tokens.push((Token::Ident(chars[start..i].iter().collect()), line));
            },
            c if c.is_ascii_digit() => {
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '.') { i += 1; }
            },
            c if c.is_whitespace() => i += 1,
            c => { tokens.push((Token::Punct(c), line)); i += 1; },
        }
    }

    Ok(tokens)
}

/// Verifies that every bracket is closed by its counterpart.
fn check_brackets(tokens: &[(Token, usize)]) -> Result<(), String> {
    let mut open: Vec<(char, usize)> = Vec::new();

    for &(ref token, line) in tokens {
        let c = match *token {
            Token::Punct(c) => c,
            Token::Ident(_) => continue,
        };
        let expected = match c {
            '(' | '{' | '[' => { open.push((c, line)); continue; },
            ')' => '(',
            '}' => '{',
            ']' => '[',
            _ => continue,
        };
        match open.pop() {
            Some((o, _)) if o == expected => (),
            Some((o, o_line)) => {
                return Err(format!("{}: '{}' does not match '{}' opened on line {}", line, c, o,
                    o_line));
            },
            None => return Err(format!("{}: unmatched '{}'", line, c)),
        }
    }

    match open.pop() {
        Some((o, o_line)) => Err(format!("{}: '{}' is never closed", o_line, o)),
        None => Ok(()),
    }
}

/// Returns the index just past the parenthesized group starting at `start`.
fn skip_group(tokens: &[(Token, usize)], start: usize) -> usize {
    let mut depth = 0;
    for (i, &(ref token, _)) in tokens.iter().enumerate().skip(start) {
        match *token {
            Token::Punct('(') => depth += 1,
            Token::Punct(')') => {
                depth -= 1;
                if depth == 0 { return i + 1; }
            },
            _ => (),
        }
    }
    tokens.len()
}

/// Collects the names of all `__kernel void name(...)` declarations.
fn kernel_names(tokens: &[(Token, usize)]) -> Vec<String> {
    let ident = |i: usize| match tokens.get(i) {
        Some(&(Token::Ident(ref s), _)) => Some(s.as_str()),
        _ => None,
    };
    let mut names = Vec::new();

    for i in 0..tokens.len() {
        match ident(i) {
            Some("__kernel") | Some("kernel") => (),
            _ => continue,
        }
        let mut j = i + 1;
        while ident(j) == Some("__attribute__") {
            j = skip_group(tokens, j + 1);
        }
        if ident(j) != Some("void") { continue; }
        if let Some(name) = ident(j + 1) {
            if tokens.get(j + 2).map(|t| &t.0) == Some(&Token::Punct('(')) {
                names.push(name.to_owned());
            }
        }
    }

    names
}

/// Verifies build options. Every option must start with '-'. `-D` and `-I`
/// may take their argument as a separate word.
fn check_options(options: &str) -> Result<(), String> {
    let mut words = options.split_whitespace();
    while let Some(word) = words.next() {
        if !word.starts_with('-') || word.len() < 2 {
            return Err(format!("invalid build option '{}'", word));
        }
        if word == "-D" || word == "-I" {
            if words.next().is_none() {
                return Err(format!("missing argument to '{}'", word));
            }
        }
    }
    Ok(())
}


/// A program of a `HostContext`.
#[derive(Clone, Debug)]
pub struct HostProgram {
    source: String,
    kernels: Option<Vec<String>>,
    build_log: String,
}

impl HostProgram {
    pub(crate) fn new(source: String) -> HostProgram {
        HostProgram { source, kernels: None, build_log: String::new() }
    }

    /// Returns the log of the last build attempt.
    pub fn build_log(&self) -> &str {
        &self.build_log
    }

    fn compile(&self, options: &str) -> Result<Vec<String>, String> {
        check_options(options)?;
        let tokens = tokenize(&self.source)?;
        check_brackets(&tokens)?;
        let names = kernel_names(&tokens);
        if names.is_empty() {
            return Err("program declares no kernels".to_owned());
        }
        Ok(names)
    }
}

impl Program for HostProgram {
    fn source(&self) -> &str {
        &self.source
    }

    fn build(&mut self, options: &str) -> OclResult<()> {
        match self.compile(options) {
            Ok(names) => {
                debug!("host program built with kernels: {:?}", names);
                self.build_log.clear();
                self.kernels = Some(names);
                Ok(())
            },
            Err(log) => {
                self.build_log = log.clone();
                self.kernels = None;
                Err(OclError::Build(log))
            },
        }
    }

    fn is_built(&self) -> bool {
        self.kernels.is_some()
    }

    fn kernel_names(&self) -> OclResult<Vec<String>> {
        self.kernels.clone().ok_or_else(|| "program has not been built".into())
    }
}
