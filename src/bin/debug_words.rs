use pdf_highlighter::words::word_tokens_to_json;
use pdf_highlighter::{extract_words, ExtractionConfig};
use std::env;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: debug-words <pdf_path> [page]");
        eprintln!();
        eprintln!("Prints each page's word stream as JSON tuples:");
        eprintln!("  [x0, y0, x1, y1, text, block_id, line_id, word_index]");
        std::process::exit(1);
    }

    let only_page: Option<u32> = args.get(2).and_then(|s| s.parse().ok());

    let pages = match extract_words(&args[1], &ExtractionConfig::default()) {
        Ok(pages) => pages,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for page in pages
        .iter()
        .filter(|p| only_page.map_or(true, |n| p.page == n))
    {
        let blocks = page.words.last().map_or(0, |w| w.block_id + 1);
        eprintln!(
            "=== PAGE {} ({} words, {} blocks) ===",
            page.page,
            page.words.len(),
            blocks
        );
        println!("{}", word_tokens_to_json(&page.words));
    }
}
