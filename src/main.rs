use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gmatch::{
    graph::CsrGraph,
    io::load_edges,
    matching::{self, graph_matching, Kind},
    triangles::{self, vertex_ranking, Relabel, Task, VertexRanking},
};
use itertools::Itertools;
use log::info;
use std::{error::Error, time::Instant};

fn load_graph(path: &str) -> Result<CsrGraph, Box<dyn Error>> {
    let time_now = Instant::now();
    let graph = CsrGraph::from_edges(&load_edges(path)?)?;
    info!(
        "loaded {} in {} ms",
        path,
        (Instant::now() - time_now).as_millis()
    );
    Ok(graph)
}

fn handle_info(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    println!("{}", load_graph(matches.value_of("EDGES").unwrap())?);
    Ok(())
}

fn handle_triangles(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let graph = load_graph(matches.value_of("EDGES").unwrap())?;
    let mut descriptor = triangles::Descriptor::new()
        .set_task(if matches.is_present("local") {
            Task::Local
        } else {
            Task::Global
        })
        .set_relabel(if matches.is_present("no-relabel") {
            Relabel::No
        } else {
            Relabel::Yes
        });
    if let Some(threshold) = matches.value_of("threshold") {
        descriptor = descriptor.set_average_degree_threshold(threshold.parse()?);
    }
    let time_now = Instant::now();
    let ranking = vertex_ranking(&descriptor, &graph)?;
    eprintln!(
        "triangles_time: {}",
        (Instant::now() - time_now).as_millis()
    );
    match ranking {
        VertexRanking::Global(count) => println!("{}", count),
        VertexRanking::Local(ranks) => println!(
            "{}",
            ranks
                .iter()
                .enumerate()
                .map(|(v, rank)| format!("{} {}", v, rank))
                .join("\n")
        ),
    }
    Ok(())
}

fn handle_match(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let target = load_graph(matches.value_of("TARGET").unwrap())?;
    let pattern = load_graph(matches.value_of("PATTERN").unwrap())?;
    let mut descriptor = matching::Descriptor::new().set_kind(if matches.is_present("non-induced")
    {
        Kind::NonInduced
    } else {
        Kind::Induced
    });
    if let Some(max) = matches.value_of("max") {
        descriptor = descriptor.set_max_match_count(max.parse()?);
    }
    let time_now = Instant::now();
    let result = graph_matching(&descriptor, &target, &pattern)?;
    eprintln!("match_time: {}", (Instant::now() - time_now).as_millis());
    if matches.is_present("print") {
        for row in result.vertex_match().rows() {
            println!("{}", row.iter().join(" "));
        }
    }
    println!("{}", result.match_count());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let edges_arg = Arg::with_name("EDGES")
        .required(true)
        .help("Edge list file (text, or SQLite with a .db extension)");
    let matches = App::new("gmatch")
        .about("Exact subgraph matching and triangle counting")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .takes_value(true)
                .global(true)
                .help("Number of worker threads"),
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Prints a summary of a graph")
                .arg(edges_arg.clone()),
        )
        .subcommand(
            SubCommand::with_name("triangles")
                .about("Counts triangles")
                .arg(edges_arg)
                .arg(
                    Arg::with_name("local")
                        .long("local")
                        .help("Prints the triangle count of every vertex"),
                )
                .arg(
                    Arg::with_name("no-relabel")
                        .long("no-relabel")
                        .help("Keeps the vertex ids on dense graphs"),
                )
                .arg(
                    Arg::with_name("threshold")
                        .long("threshold")
                        .takes_value(true)
                        .help("Average degree from which a graph counts as dense"),
                ),
        )
        .subcommand(
            SubCommand::with_name("match")
                .about("Enumerates the embeddings of a pattern")
                .arg(Arg::with_name("TARGET").required(true))
                .arg(Arg::with_name("PATTERN").required(true))
                .arg(
                    Arg::with_name("non-induced")
                        .long("non-induced")
                        .help("Allows extra target edges between matched vertices"),
                )
                .arg(
                    Arg::with_name("max")
                        .long("max")
                        .takes_value(true)
                        .help("Stops after this many matches"),
                )
                .arg(
                    Arg::with_name("print")
                        .long("print")
                        .help("Prints every match, one target vertex per pattern vertex"),
                ),
        )
        .get_matches();
    let threads = matches
        .value_of("threads")
        .or_else(|| matches.subcommand().1.and_then(|m| m.value_of("threads")));
    if let Some(threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads.parse()?)
            .build_global()?;
    }
    if let Some(matches) = matches.subcommand_matches("info") {
        handle_info(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("triangles") {
        handle_triangles(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("match") {
        handle_match(matches)?;
    }
    Ok(())
}
