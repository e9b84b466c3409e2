use bwtzip::{Decoder, Encoder, SentinelPolicy, SuffixArray, SuffixTree};
use std::env;
use std::fs;
use std::process;

/// Command-line front end for the compressor.
///
/// Usage:
///   cargo run --example cli encode <text-file> [out]
///   cargo run --example cli decode <container-file> [out]
///   cargo run --example cli rank <text-file> <positions-file>
fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("cli");

    match args.get(1).map(String::as_str) {
        Some("encode") if (3..=4).contains(&args.len()) => {
            encode(&args[2], args.get(3).map_or("encoded.bwz", String::as_str))
        }
        Some("decode") if (3..=4).contains(&args.len()) => {
            decode(&args[2], args.get(3).map_or("decoded.txt", String::as_str))
        }
        Some("rank") if args.len() == 4 => rank(&args[2], &args[3]),
        _ => {
            eprintln!("Usage: {} encode <text-file> [out]", program);
            eprintln!("       {} decode <container-file> [out]", program);
            eprintln!("       {} rank <text-file> <positions-file>", program);
            process::exit(1);
        }
    }
}

fn encode(input: &str, output: &str) {
    let text = read_first_line(input);
    let (packed, stats) = Encoder::new()
        .sentinel(SentinelPolicy::Append)
        .encode_with_stats(text.as_bytes())
        .unwrap_or_else(|err| fail(&err));
    write(output, &packed);

    println!("=== Statistics ===");
    println!("Text length: {} symbols", stats.text_length);
    println!("Distinct symbols: {}", stats.distinct_symbols);
    println!("BWT runs: {}", stats.runs);
    println!("Payload bits: {}", stats.payload_bits);
    println!("Container size: {} bytes", stats.container_bytes);
    println!("Compression ratio: {:.2}%", stats.compression_ratio());
}

fn decode(input: &str, output: &str) {
    let packed = fs::read(input).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", input);
        process::exit(1);
    });
    let text = Decoder::new()
        .decode(&packed)
        .unwrap_or_else(|err| fail(&err));
    write(output, &text);
    println!("Decoded {} symbols into {}", text.len(), output);
}

/// Writes the 1-based suffix array rank of each 1-based position, one per line.
fn rank(text_file: &str, positions_file: &str) {
    let mut text = read_first_line(text_file).into_bytes();
    if text.last() != Some(&b'$') {
        text.push(b'$');
    }

    let tree = SuffixTree::build(&text).unwrap_or_else(|err| fail(&err));
    let suffix_array = SuffixArray::from_tree(&tree);
    let ranks = suffix_array.ranks();

    let positions = fs::read_to_string(positions_file).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", positions_file);
        process::exit(1);
    });

    let mut report = String::new();
    for token in positions.split_whitespace() {
        let rank = token
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|offset| ranks.get(offset))
            .unwrap_or_else(|| {
                eprintln!("Position \"{}\" is outside the text.", token);
                process::exit(1);
            });
        report.push_str(&format!("{}\n", rank + 1));
    }
    write("ranks.txt", report.as_bytes());
}

fn read_first_line(path: &str) -> String {
    let contents = fs::read_to_string(path).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", path);
        process::exit(1);
    });
    contents.lines().next().unwrap_or("").trim().to_string()
}

fn write(path: &str, bytes: &[u8]) {
    if let Err(err) = fs::write(path, bytes) {
        eprintln!("Cannot write \"{}\": {}", path, err);
        process::exit(1);
    }
}

fn fail(err: &bwtzip::Error) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}
