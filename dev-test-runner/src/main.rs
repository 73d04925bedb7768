//! Golden-file replay.
//!
//! - `fixtures/generate/<name>.json` is a descriptor document; each sibling
//!   `<name>.<ext>` (cs, java, rs) is the expected member for that target.
//! - `fixtures/fix/<name>.input.cs` is fixed and compared to `<name>.expected.cs`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use describe_gen::{FixOptions, GenerateOptions, Stringifier, Target, fix_source};

fn main() -> Result<()> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    let mut failures = 0usize;
    let mut checked = 0usize;

    for descriptor_path in glob_sorted(&root.join("generate").join("*.json"))? {
        let source = std::fs::read_to_string(&descriptor_path)?;
        let document = serde_json::from_str::<serde_json::Value>(&source)
            .with_context(|| format!("bad fixture {}", descriptor_path.display()))?;
        let descriptors = describe_gen::path_de::descriptors_from_value(document)
            .map_err(|e| anyhow::anyhow!("bad fixture {}: {e}", descriptor_path.display()))?;

        for target in [Target::Csharp, Target::Java, Target::Rust] {
            let golden = descriptor_path.with_extension(target.extension());
            if !golden.exists() {
                continue;
            }
            let expected = std::fs::read_to_string(&golden)?;
            let stringifier = Stringifier::new(GenerateOptions::for_target(target));
            let actual = descriptors
                .iter()
                .map(|ty| stringifier.generate(ty).map(|m| m.source_text))
                .collect::<Result<Vec<_>, _>>()?
                .join("\n\n");
            checked += 1;
            failures += report(&golden, expected.trim_end_matches('\n'), &actual);
        }
    }

    for input in glob_sorted(&root.join("fix").join("*.input.cs"))? {
        let golden = expected_for(&input)?;
        let source = std::fs::read_to_string(&input)?;
        let expected = std::fs::read_to_string(&golden)?;
        let outcome = fix_source(&source, &FixOptions::default())?;
        checked += 1;
        failures += report(&golden, &expected, &outcome.source);
    }

    if failures > 0 {
        bail!("{failures} of {checked} fixtures differ");
    }
    eprintln!("{} {checked} fixtures", "all passed".green().bold());
    Ok(())
}

fn glob_sorted(pattern: &Path) -> Result<Vec<PathBuf>> {
    let pattern = pattern.to_string_lossy();
    let mut paths = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

fn expected_for(input: &Path) -> Result<PathBuf> {
    let name = input.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let Some(stem) = name.strip_suffix(".input.cs") else {
        bail!("unexpected fixture name {}", input.display());
    };
    Ok(input.with_file_name(format!("{stem}.expected.cs")))
}

fn report(golden: &Path, expected: &str, actual: &str) -> usize {
    if expected == actual {
        eprintln!("{} {}", "ok".green(), golden.display());
        return 0;
    }
    eprintln!("{} {}", "FAIL".red().bold(), golden.display());
    for (i, (e, a)) in expected.lines().zip(actual.lines()).enumerate() {
        if e != a {
            eprintln!("  first difference at line {}:\n    expected: {e:?}\n    actual:   {a:?}", i + 1);
            return 1;
        }
    }
    eprintln!(
        "  line counts differ: expected {}, actual {}",
        expected.lines().count(),
        actual.lines().count()
    );
    1
}
