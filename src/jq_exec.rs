//! Optional jq pre-processing: reshape arbitrary input JSON into descriptor documents.
use anyhow::{anyhow, Context, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`; every output of the filter becomes one document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let mut it = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    while let Some(item) = it.next() {
        let v = item.map_err(|e| anyhow!(format!("{e:?}")))?;
        // Val's Display is JSON text
        let text = format!("{v}");
        let value = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("jq produced a value that is not JSON: {text}"))?;
        out.push(value);
    }
    Ok(out)
}

fn format_parse_errors(
    errs: Vec<(load::File<&str, ()>, load::Error<&str>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow::anyhow!(s)
}

fn format_undefined_errors(
    errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>,
) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow::anyhow!(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reshapes_into_descriptor_documents() {
        let input = json!({"models": [
            {"n": "Point", "props": ["X", "Y"]},
            {"n": "Unit", "props": []}
        ]});
        let out = run_jaq(".models[] | {typeName: .n, fields: [.props[] | {name: .}]}", &input).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], json!({"typeName": "Point", "fields": [{"name": "X"}, {"name": "Y"}]}));
        assert_eq!(out[1]["fields"], json!([]));
    }

    #[test]
    fn parse_errors_surface() {
        assert!(run_jaq(".models[", &json!({})).is_err());
    }
}
