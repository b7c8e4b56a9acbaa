//! Text edge lists: one `src dst` pair per line, separated by blanks or a comma.
//! Blank lines and `#` comments are skipped.

use crate::{
    error::{Error, Result},
    types::{EdgeList, VId},
};
use itertools::Itertools;
use memmap::Mmap;
use pest::Parser;
use pest_derive::Parser;
use std::{fs::File, path::Path};

#[derive(Parser)]
#[grammar = "io/grammar.pest"]
struct EdgeListParser;

pub fn parse_edge_list(input: &str) -> Result<EdgeList> {
    let mut edges = vec![];
    for pair in EdgeListParser::parse(Rule::edge_list, input).map_err(parse_error)? {
        match pair.as_rule() {
            Rule::edge => {
                let (src, dst) = pair
                    .into_inner()
                    .map(parse_vid)
                    .collect_tuple()
                    .ok_or_else(|| Error::Parse("edge without two endpoints".to_owned()))?;
                edges.push((src?, dst?));
            }
            Rule::EOI => {}
            _ => unreachable!(),
        }
    }
    Ok(edges)
}

/// Reads an edge list file through a memory map.
pub fn load_edge_list<P: AsRef<Path>>(path: P) -> Result<EdgeList> {
    let file = File::open(path)?;
    // Empty files cannot be mapped.
    if file.metadata()?.len() == 0 {
        return Ok(vec![]);
    }
    let mmap = unsafe { Mmap::map(&file)? };
    let input = std::str::from_utf8(&mmap).map_err(|e| Error::Parse(e.to_string()))?;
    parse_edge_list(input)
}

fn parse_vid(pair: pest::iterators::Pair<Rule>) -> Result<VId> {
    pair.as_str().parse().map_err(|_| {
        parse_error(pest::error::Error::new_from_span(
            pest::error::ErrorVariant::CustomError {
                message: String::from("vertex id out of range"),
            },
            pair.as_span(),
        ))
    })
}

fn parse_error(e: pest::error::Error<Rule>) -> Error {
    Error::Parse(e.to_string())
}
