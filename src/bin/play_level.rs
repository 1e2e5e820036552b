//! Interactive terminal play: load a level, type moves like `B3`.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use chroma_solver::level::parse_levels;
use chroma_solver::utils::parse_move;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the levels XML file
    levels_file: PathBuf,

    /// Level index to play
    #[clap(default_value_t = 0)]
    level: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let xml = fs::read_to_string(&args.levels_file)
        .with_context(|| format!("reading {}", args.levels_file.display()))?;
    let levels = parse_levels(&xml)?;
    let level = levels
        .get(args.level)
        .with_context(|| format!("no level {} in the file", args.level))?;
    let initial = level.to_board()?;

    let mut board = initial.clone();
    println!("Level {} — moves like B3, 'r' resets, 'q' quits.", args.level);

    loop {
        println!("\nMoves: {}  ({})", board.moves().len(), board.moves());
        println!("{board}");

        if board.is_solved() {
            println!("\nSolved in {} moves!", board.moves().len());
            break;
        }

        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "q" => break,
            "r" => {
                board = initial.clone();
                println!("Board reset.");
            }
            _ => match parse_move(input) {
                Ok(mv) => {
                    if !board.apply_click(mv.row as usize, mv.col as usize) {
                        println!("Nothing happened.");
                    }
                }
                Err(_) => println!("Could not read '{input}'. Try a move like B3."),
            },
        }
    }
    Ok(())
}
