//! The per-file inclusion pipeline: one ordered sequence of checks mapping a
//! candidate to an extract/skip verdict.

use crate::domain::{
    is_recognized_language, language_for_extension, language_for_filename,
    language_for_interpreter, Config, SkipReason,
};
use crate::scan::classify::{
    is_binary_extension, is_lockfile_name, is_size_allowed, normalized_extension,
};
use crate::scan::rules::IgnoreRules;
use crate::utils::is_binary_sample;
use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::Path;

static SHEBANG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#!\s*(\S+)(?:\s+(\S+))?").unwrap());

/// Outcome of the pipeline for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Extract { language: String },
    Skip(SkipReason),
}

/// Composes the ignore rules, the cheap path classifiers, the user extension
/// lists and language recognition into one verdict per file.
///
/// Check order is fixed, first match wins: ignore rules, exclude globs,
/// excluded extensions, binary extensions, lockfile names, included
/// extensions (accept), size limit, language recognition. The explicit
/// include list therefore overrides the size and language gates but never
/// resurrects an ignored, binary or lockfile path.
pub struct Decision<'a> {
    rules: &'a IgnoreRules,
    include: HashSet<String>,
    exclude: HashSet<String>,
    exclude_globs: GlobSet,
    max_file_size_kb: u64,
}

impl<'a> Decision<'a> {
    pub fn new(config: &Config, rules: &'a IgnoreRules) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.exclude_globs {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(err) => tracing::warn!("skipping invalid exclude glob {pattern:?}: {err}"),
            }
        }
        let exclude_globs = builder.build().unwrap_or_else(|err| {
            tracing::warn!("failed to build exclude glob set: {err}");
            GlobSet::empty()
        });

        Self {
            rules,
            include: config.include_extensions.iter().cloned().collect(),
            exclude: config.exclude_extensions.iter().cloned().collect(),
            exclude_globs,
            max_file_size_kb: config.max_file_size_kb,
        }
    }

    pub fn decide(&self, path: &Path, relative_path: &str) -> Verdict {
        if self.rules.ignores(relative_path) {
            return Verdict::Skip(SkipReason::Ignored);
        }
        if self.exclude_globs.is_match(relative_path) {
            return Verdict::Skip(SkipReason::ExcludedGlob);
        }

        let ext = normalized_extension(path);
        if !ext.is_empty() && self.exclude.contains(&ext) {
            return Verdict::Skip(SkipReason::ExcludedExtension);
        }
        if is_binary_extension(path) {
            return Verdict::Skip(SkipReason::BinaryExtension);
        }
        if is_lockfile_name(path) {
            return Verdict::Skip(SkipReason::Lockfile);
        }

        if !ext.is_empty() && self.include.contains(&ext) {
            // Explicit includes always win from here on; a failed inspection
            // downgrades to a generic tag instead of rejecting.
            let language =
                inspect_language(path).unwrap_or_else(|_| "plaintext".to_string());
            return Verdict::Extract { language };
        }

        match is_size_allowed(path, self.max_file_size_kb) {
            Ok(true) => {}
            Ok(false) => return Verdict::Skip(SkipReason::TooLarge),
            Err(err) => {
                tracing::warn!("size check failed for {}: {err}", path.display());
                return Verdict::Skip(SkipReason::Unreadable);
            }
        }

        match inspect_language(path) {
            Ok(tag) if is_recognized_language(&tag) => Verdict::Extract { language: tag },
            Ok(_) => Verdict::Skip(SkipReason::UnrecognizedLanguage),
            Err(err) => {
                tracing::warn!("language inspection failed for {}: {err}", path.display());
                Verdict::Skip(SkipReason::Unreadable)
            }
        }
    }
}

/// Resolve a candidate's language tag.
///
/// Extension and well-known filenames settle most files without touching the
/// content; the rest get a content sample (binary check plus shebang sniff)
/// and default to `plaintext` when nothing more specific matches.
pub fn inspect_language(path: &Path) -> Result<String> {
    let ext = normalized_extension(path);
    if !ext.is_empty() {
        if let Some(tag) = language_for_extension(&ext) {
            return Ok(tag.to_string());
        }
    } else {
        let name =
            path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_ascii_lowercase();
        if let Some(tag) = language_for_filename(&name) {
            return Ok(tag.to_string());
        }
    }

    if is_binary_sample(path)? {
        anyhow::bail!("content sample looks binary: {}", path.display());
    }
    if let Some(tag) = shebang_language(path) {
        return Ok(tag.to_string());
    }
    Ok("plaintext".to_string())
}

fn shebang_language(path: &Path) -> Option<&'static str> {
    let file = std::fs::File::open(path).ok()?;
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line).ok()?;

    let captures = SHEBANG.captures(&first_line)?;
    let command = captures.get(1)?.as_str();
    let interpreter = match command.rsplit('/').next()? {
        "env" => captures.get(2)?.as_str().rsplit('/').next()?,
        direct => direct,
    };
    language_for_interpreter(interpreter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_with(include: &[&str], exclude: &[&str]) -> Config {
        Config {
            include_extensions: include.iter().map(|s| s.to_string()).collect(),
            exclude_extensions: exclude.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        }
    }

    fn decide_in(tmp: &TempDir, config: &Config, rel: &str) -> Verdict {
        let rules = IgnoreRules::load(tmp.path());
        let decision = Decision::new(config, &rules);
        decision.decide(&tmp.path().join(rel), rel)
    }

    #[test]
    fn test_recognized_language_accepted_by_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "print('hi')\n").unwrap();

        let verdict = decide_in(&tmp, &Config::default(), "main.py");
        assert_eq!(verdict, Verdict::Extract { language: "python".to_string() });
    }

    #[test]
    fn test_unrecognized_language_skipped_by_default() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[a]\n").unwrap();

        let verdict = decide_in(&tmp, &Config::default(), "config.toml");
        assert_eq!(verdict, Verdict::Skip(SkipReason::UnrecognizedLanguage));
    }

    #[test]
    fn test_include_list_overrides_language_recognition() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[a]\n").unwrap();

        let verdict = decide_in(&tmp, &config_with(&[".toml"], &[]), "config.toml");
        assert_eq!(verdict, Verdict::Extract { language: "toml".to_string() });
    }

    #[test]
    fn test_include_list_overrides_size_limit() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("big.py"), "x".repeat(4096)).unwrap();

        let mut config = config_with(&[".py"], &[]);
        config.max_file_size_kb = 1;
        let verdict = decide_in(&tmp, &config, "big.py");
        assert_eq!(verdict, Verdict::Extract { language: "python".to_string() });
    }

    #[test]
    fn test_exclude_list_beats_include_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("main.py"), "print('hi')\n").unwrap();

        let verdict = decide_in(&tmp, &config_with(&[".py"], &[".py"]), "main.py");
        assert_eq!(verdict, Verdict::Skip(SkipReason::ExcludedExtension));
    }

    #[test]
    fn test_binary_extension_not_resurrected_by_include() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("logo.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let verdict = decide_in(&tmp, &config_with(&[".png"], &[]), "logo.png");
        assert_eq!(verdict, Verdict::Skip(SkipReason::BinaryExtension));
    }

    #[test]
    fn test_lockfile_not_resurrected_by_include() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Cargo.lock"), "[[package]]\n").unwrap();

        let verdict = decide_in(&tmp, &config_with(&[".lock"], &[]), "Cargo.lock");
        assert_eq!(verdict, Verdict::Skip(SkipReason::Lockfile));
    }

    #[test]
    fn test_ignore_rules_beat_include_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "generated.py\n").unwrap();
        fs::write(tmp.path().join("generated.py"), "print('gen')\n").unwrap();

        let verdict = decide_in(&tmp, &config_with(&[".py"], &[]), "generated.py");
        assert_eq!(verdict, Verdict::Skip(SkipReason::Ignored));
    }

    #[test]
    fn test_exclude_glob_beats_include_list() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("fixtures")).unwrap();
        fs::write(tmp.path().join("fixtures/data.py"), "DATA = 1\n").unwrap();

        let mut config = config_with(&[".py"], &[]);
        config.exclude_globs = vec!["fixtures/**".to_string()];
        let verdict = decide_in(&tmp, &config, "fixtures/data.py");
        assert_eq!(verdict, Verdict::Skip(SkipReason::ExcludedGlob));
    }

    #[test]
    fn test_size_limit_rejects_oversized_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("big.py"), "x".repeat(1025)).unwrap();

        let mut config = Config::default();
        config.max_file_size_kb = 1;
        let verdict = decide_in(&tmp, &config, "big.py");
        assert_eq!(verdict, Verdict::Skip(SkipReason::TooLarge));
    }

    #[test]
    fn test_vanished_file_is_a_local_rejection() {
        let tmp = TempDir::new().unwrap();
        let verdict = decide_in(&tmp, &Config::default(), "vanished.py");
        assert_eq!(verdict, Verdict::Skip(SkipReason::Unreadable));
    }

    #[test]
    fn test_inspect_language_shebang() {
        let tmp = TempDir::new().unwrap();
        let script = tmp.path().join("deploy");
        fs::write(&script, "#!/usr/bin/env python3\nprint('deploy')\n").unwrap();
        assert_eq!(inspect_language(&script).unwrap(), "python");

        let shell = tmp.path().join("run");
        fs::write(&shell, "#!/bin/bash\necho hi\n").unwrap();
        assert_eq!(inspect_language(&shell).unwrap(), "shellscript");
    }

    #[test]
    fn test_inspect_language_unknown_text_is_plaintext() {
        let tmp = TempDir::new().unwrap();
        let notes = tmp.path().join("NOTES");
        fs::write(&notes, "remember to ship\n").unwrap();
        assert_eq!(inspect_language(&notes).unwrap(), "plaintext");
    }

    #[test]
    fn test_inspect_language_binary_content_fails() {
        let tmp = TempDir::new().unwrap();
        let blob = tmp.path().join("blob");
        fs::write(&blob, [0u8, 159, 146, 150]).unwrap();
        assert!(inspect_language(&blob).is_err());
    }
}
