//! Command bodies, written against caller-supplied readers and writers.

use anyhow::{anyhow, Result};
use docsearch_core::{DocId, Index};
use std::io::{BufRead, Write};

use crate::{render_text, run_query, strip_markup};

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub limit: usize,
    pub json: bool,
}

pub fn print_query<W: Write>(out: &mut W, index: &Index, query: &str, opts: OutputOptions) -> Result<()> {
    let resp = run_query(index, query, opts.limit);
    if opts.json {
        writeln!(out, "{}", serde_json::to_string(&resp)?)?;
    } else {
        write!(out, "{}", render_text(&resp))?;
    }
    out.flush()?;
    Ok(())
}

/// Answer one query per non-blank input line until the input ends.
pub fn interactive<R: BufRead, W: Write>(input: R, out: &mut W, index: &Index, opts: OutputOptions) -> Result<usize> {
    tracing::info!("reading queries from stdin");
    let mut answered = 0;
    for line in input.lines() {
        let line = line?;
        let query = line.trim();
        if query.is_empty() { continue; }
        print_query(out, index, query, opts)?;
        answered += 1;
    }
    Ok(answered)
}

pub fn show<W: Write>(out: &mut W, index: &Index, doc_id: DocId, json: bool) -> Result<()> {
    let doc = index.document(doc_id).ok_or_else(|| anyhow!("document {doc_id} not found"))?;
    if json {
        let obj = serde_json::json!({
            "doc_id": doc_id,
            "title": doc.title,
            "location": doc.location,
            "text": doc.text,
        });
        writeln!(out, "{obj}")?;
    } else {
        writeln!(out, "{}\n{}\n\n{}", doc.title, doc.location, strip_markup(&doc.text))?;
    }
    Ok(())
}

pub fn stats<W: Write>(out: &mut W, index: &Index) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(&index.stats())?)?;
    Ok(())
}
