use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use wordnet_dict::Dictionary;
use wordnet_types::{Pos, PosSelect};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dict_dir = args.next().map(PathBuf::from).context(
        "usage: cargo run -p wordnet-dict --example lookup -- <dict-dir> <word> [n|v|a|r]",
    )?;
    let query = args
        .next()
        .context("usage: cargo run -p wordnet-dict --example lookup -- <dict-dir> <word> [n|v|a|r]")?;
    let pos = match args.next() {
        Some(key) => match Pos::from_key(&key) {
            Some(pos) => PosSelect::One(pos),
            None => bail!("unknown part of speech key: {key}"),
        },
        None => PosSelect::All,
    };

    let dict = Dictionary::open(&dict_dir)
        .with_context(|| format!("opening dictionary at {}", dict_dir.display()))?;

    let bases = dict.base_forms(&query, pos);
    if bases.is_empty() {
        println!("no base forms for \"{query}\"");
        return Ok(());
    }
    println!("base forms: {bases:?}");

    for synset in dict.lookup_synsets(&query, pos)? {
        println!("\n{} [{}]", synset.description(), synset.pos());
        if !synset.gloss().is_empty() {
            println!("  {}", synset.gloss());
        }
        for relation in synset.relations() {
            let target = relation.target(&dict)?;
            println!(
                "  {} -> {}",
                relation.rel_type().label_for(synset.pos()),
                target.synset().description(),
            );
        }
    }
    Ok(())
}
