//! # Bookflow CLI
//!
//! Usage:
//!   bookflow input.md -o pages.json
//!   echo '# Hello' | bookflow --main-color '#166534'
//!   bookflow --example > sample.md

use std::env;
use std::fs;
use std::io::{self, Read};

use bookflow::model::{LayoutRequest, PageMetrics};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Handle --example flag
    if args.iter().any(|a| a == "--example") {
        print!("{}", example_markup());
        return;
    }

    // Read input
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .expect("Failed to read stdin");
        buf
    };

    let flag = |name: &str| {
        args.windows(2)
            .find(|w| w[0] == name)
            .map(|w| w[1].clone())
    };

    let defaults = PageMetrics::default();
    let request = LayoutRequest {
        text: input,
        main_color: flag("--main-color").unwrap_or_else(|| "#1e3a5f".to_string()),
        accent_color: flag("--accent-color"),
        page_width: flag("--width")
            .map(|v| v.parse().expect("--width must be a number"))
            .unwrap_or(defaults.width),
        page_height: flag("--height")
            .map(|v| v.parse().expect("--height must be a number"))
            .unwrap_or(defaults.height),
    };

    match bookflow::paginate_request(&request) {
        Ok(pages) => {
            let json = serde_json::to_string_pretty(&pages).expect("Failed to serialize pages");
            match flag("-o") {
                Some(path) => {
                    fs::write(&path, &json).expect("Failed to write output");
                    eprintln!("✓ Written {} pages to {}", pages.len(), path);
                }
                None => println!("{json}"),
            }
        }
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}

fn example_markup() -> &'static str {
    r#"# The Home Baker's Handbook

## Getting the Basics Right

Good bread needs only four ingredients, but each one earns its place.

> important: always weigh your flour — volume measurements drift by up to 20%.

### Choosing Flour

- Bread flour for chew
- All-purpose for tenderness
1. Check the protein content
2. Check the milling date

[STEP 1] Combine flour, water, salt, and yeast in a large bowl.
[STEP 2] Rest the dough for 30 minutes before the first fold.

| Flour | Protein | Best for |
|-------|---------|----------|
| Bread | 12-14%  | Loaves   |
| Cake  | 7-9%    | Sponges  |

[SUMMARY] Weigh everything, keep the dough warm, and be patient.

[QUOTE] Bread is the simplest food with the longest apprenticeship.

[x] Preheat the oven
[x] Score the loaf

[HIGHLIGHT] Steam in the first ten minutes makes the crust.

[IMAGE: a round loaf cooling on a wire rack]

---

Next chapter: shaping and scoring.
"#
}
