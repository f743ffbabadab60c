//! # Quire CLI
//!
//! Usage:
//!   quire input.json -o layout.json
//!   echo '{ ... }' | quire -o layout.json
//!   quire input.json --pages
//!   quire --example > report.json

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_report_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    };
    let input = match input {
        Ok(text) => text,
        Err(e) => fail(&format!("Failed to read input: {}", e)),
    };

    let document = match quire::from_json(&input) {
        Ok(doc) => doc,
        Err(e) => fail(&e.to_string()),
    };

    if args.iter().any(|a| a == "--pages") {
        match quire::page_count(&document) {
            Ok(n) => println!("{}", n),
            Err(e) => fail(&e.to_string()),
        }
        return;
    }

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "layout.json".to_string());

    let bytes = match quire::render_layout(&document) {
        Ok(bytes) => bytes,
        Err(e) => fail(&e.to_string()),
    };
    if let Err(e) = fs::write(&output_path, &bytes) {
        fail(&format!("Failed to write {}: {}", output_path, e));
    }
    eprintln!("✓ Written {} bytes to {}", bytes.len(), output_path);
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {}", message);
    process::exit(1);
}

fn example_report_json() -> &'static str {
    r##"{
  "metadata": {
    "title": "Inventory Report",
    "author": "Quire"
  },
  "config": {
    "size": "A4",
    "margins": { "top": 54, "right": 54, "bottom": 54, "left": 54 },
    "footer": {
      "enabled": true,
      "height": 30,
      "content": { "showPageNumber": true }
    },
    "watermark": { "text": "DRAFT" }
  },
  "elements": [
    {
      "type": "Text",
      "text": "Inventory Report",
      "fontSize": 24,
      "typeface": { "family": "Helvetica", "weight": 700 },
      "paragraphSpacing": 16
    },
    {
      "type": "Text",
      "text": "Stock levels as counted at the end of the quarter. Items below their reorder point are listed separately."
    },
    { "type": "Divider" },
    {
      "type": "Table",
      "rows": [
        {
          "isHeader": true,
          "cells": [
            { "content": "SKU", "typeface": { "weight": 700 } },
            { "content": "Description", "typeface": { "weight": 700 } },
            { "content": "On hand", "typeface": { "weight": 700 } }
          ]
        },
        { "cells": [ { "content": "A-100" }, { "content": "Hex bolt, M6" }, { "content": "1200" } ] },
        { "cells": [ { "content": "A-101" }, { "content": "Hex bolt, M8" }, { "content": "860" } ] },
        { "cells": [ { "content": "B-200" }, { "content": "Washer, 6mm" }, { "content": "4000" } ] }
      ],
      "columnWidths": [80, 280, 127]
    },
    {
      "type": "List",
      "numbered": true,
      "items": ["Recount bin A-101", "Order washers", "Archive Q2 sheets"]
    },
    { "type": "PageBreak" },
    {
      "type": "QrCode",
      "data": "https://example.com/inventory",
      "size": 120
    }
  ]
}
"##
}
