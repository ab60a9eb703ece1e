use std::path::PathBuf;
use std::process;

use clap::Parser;
use docxide_model::model::{Model, TextContainer};
use docxide_model::numbering::FormatterOptions;
use docxide_model::{Document, ParserOptions, XmlParser, ZipPackage};

/// Parse a DOCX package and print a view of its semantic model.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input .docx file
    input: PathBuf,

    /// Print plain text, one line per paragraph
    #[arg(long)]
    text: bool,

    /// Print the block structure (default)
    #[arg(long)]
    outline: bool,

    /// Print list paragraphs with their formatted markers
    #[arg(long)]
    lists: bool,

    /// Print images with their resolved parts and pixel sizes
    #[arg(long)]
    images: bool,

    /// Reset deeper list levels when a shallower level advances
    #[arg(long)]
    restart_deeper_levels: bool,

    /// Do not keep verbatim XML on parsed nodes
    #[arg(long)]
    no_raw_xml: bool,

    /// Drop runs that carry a watermark shape
    #[arg(long)]
    skip_watermarks: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let options = ParserOptions {
        keep_raw_xml: !args.no_raw_xml,
        numbering: FormatterOptions {
            restart_deeper_levels: args.restart_deeper_levels,
        },
        skip_watermarks: args.skip_watermarks,
        ..Default::default()
    };

    let package = match ZipPackage::open(&args.input) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let parser = XmlParser::with_options(&package, options);
    let doc = match parser.parse_document() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let show_outline = args.outline || !(args.text || args.lists || args.images);
    if args.text {
        println!("{}", doc.get_text());
    }
    if show_outline {
        print_outline(&doc);
    }
    if args.lists {
        print_lists(&doc);
    }
    if args.images {
        print_images(&parser, &doc);
    }
}

fn preview(text: &str) -> String {
    let mut s: String = text.chars().take(60).collect();
    if text.chars().count() > 60 {
        s.push('…');
    }
    s.replace('\n', "⏎").replace('\t', "→")
}

fn print_outline(doc: &Document) {
    for (i, model) in doc.body.iter().enumerate() {
        match model {
            Model::Paragraph(p) => {
                let style = p.style.style_id.as_deref().unwrap_or("-");
                let fields = p.fields().count();
                print!("{i:4} P [{style}] {:?}", preview(&p.get_text()));
                if fields > 0 {
                    print!(" fields={fields}");
                }
                if p.section_properties.is_some() {
                    print!(" (section break)");
                }
                println!();
            }
            Model::Table(t) => {
                println!(
                    "{i:4} T {}x{} grid={}",
                    t.rows.len(),
                    t.column_count(),
                    t.grid.len()
                );
                for issue in t.validate_structure() {
                    println!("       ! {issue}");
                }
            }
            Model::TextBox(tb) => println!("{i:4} X {:?}", preview(&tb.content.get_text())),
            Model::Image(img) => println!("{i:4} I {:?}", img.source.path()),
            other => println!("{i:4} {:?}", other.kind()),
        }
    }
    println!(
        "headers={} footers={} footnotes={} endnotes={}",
        doc.headers.len(),
        doc.footers.len(),
        doc.footnotes.values().filter(|n| !n.is_separator()).count(),
        doc.endnotes.values().filter(|n| !n.is_separator()).count(),
    );
}

fn print_lists(doc: &Document) {
    for p in doc.body.all_paragraphs() {
        let Some(numbering) = p.numbering.as_ref().filter(|n| !n.is_removal()) else {
            continue;
        };
        let marker = p.marker.as_ref().map_or("?", |m| m.text.as_str());
        let level: usize = numbering.level_index().map_or(0, usize::from);
        println!(
            "{}[{}:{}] {marker} {}",
            "  ".repeat(level),
            numbering.id,
            numbering.level,
            preview(&p.get_text())
        );
    }
}

fn print_images(parser: &XmlParser, doc: &Document) {
    let mut images = doc.body.get_images();
    for table in doc.body.get_tables() {
        images.extend(table.get_images());
    }
    for img in images {
        let name = img.name.as_deref().unwrap_or("-");
        match parser.load_image(img) {
            Ok(data) => println!(
                "{name}: {} {:?} {}x{}px, {:.1}x{:.1}pt",
                img.source.path().unwrap_or("-"),
                data.format,
                data.pixel_width,
                data.pixel_height,
                img.width_pt(),
                img.height_pt()
            ),
            Err(e) => println!("{name}: {e}"),
        }
    }
}
