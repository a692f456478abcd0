use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Args;
use crate::domain::document::{flatten_value, parse_tree};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// JSON file holding a rich-text document tree; reads stdin when omitted.
    pub file: Option<PathBuf>,
}

pub fn run(args: NormalizeArgs) -> AppResult<()> {
    let raw = match args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    print!("{}", normalize(&raw)?);
    Ok(())
}

fn normalize(raw: &str) -> AppResult<String> {
    // Trees nested past the flatten depth cap yield nothing anyway.
    Ok(parse_tree(raw)?
        .map(|tree| flatten_value(&tree))
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_raw_json() {
        let raw = r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hello"}]}]}"#;
        assert_eq!(normalize(raw).unwrap(), "Hello\n");
        assert_eq!(normalize("null").unwrap(), "");
    }

    #[test]
    fn flattens_trees_deeper_than_default_parser_limit() {
        let mut raw = r#"{"type":"paragraph","content":[{"type":"text","text":"quoted"}]}"#.to_string();
        for _ in 0..200 {
            raw = format!(r#"{{"type":"blockquote","content":[{raw}]}}"#);
        }
        assert_eq!(normalize(&raw).unwrap(), "quoted\n");
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(normalize("{not json").is_err());
    }
}
