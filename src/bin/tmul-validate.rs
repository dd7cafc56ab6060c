use std::env;
use std::process;
use tmul::resolver::is_style_attribute;
use tmul::{decode_file, document, Node, TmulError};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: tmul-validate <file.xml>...");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  tmul-validate xml/index.xml");
        eprintln!("  tmul-validate xml/*.xml");
        process::exit(1);
    }

    let mut exit_code = 0;

    for file_path in &args[1..] {
        match validate_file(file_path) {
            Ok(notes) => {
                println!("✓ {} is valid", file_path);
                for note in notes {
                    println!("  note: {}", note);
                }
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    process::exit(exit_code);
}

fn validate_file(path: &str) -> Result<Vec<String>, TmulError> {
    let root = decode_file(path)?;
    document::validate(&root)?;

    let mut notes = Vec::new();
    collect_ignored_attributes(&root, true, &mut notes);
    Ok(notes)
}

/// Attributes the renderer does not understand. They are not errors.
fn collect_ignored_attributes(node: &Node, is_root: bool, notes: &mut Vec<String>) {
    for key in node.attributes.keys() {
        if is_style_attribute(key) || (is_root && key.eq_ignore_ascii_case("type")) {
            continue;
        }
        notes.push(format!("<{}> attribute '{}' is ignored", node.kind, key));
    }
    for child in &node.children {
        collect_ignored_attributes(child, false, notes);
    }
}

fn print_error(error: &TmulError) {
    match error {
        TmulError::Xml { position, message } => {
            eprintln!("  Parse error at byte {}:", position);
            eprintln!("    {}", message);
        }
        TmulError::InvalidAttribute { position, message } => {
            eprintln!("  Invalid attribute at byte {}:", position);
            eprintln!("    {}", message);
        }
        TmulError::UnbalancedEndTag { tag } => {
            eprintln!("  Closing tag </{}> has no matching open element", tag);
        }
        TmulError::MultipleRoots { first, second } => {
            eprintln!("  Multiple root elements found: <{}> and <{}>", first, second);
            eprintln!("    A document must have exactly one root element");
        }
        TmulError::MaxNestingDepthExceeded { max_depth } => {
            eprintln!("  Maximum nesting depth ({}) exceeded", max_depth);
            eprintln!("    Elements are nested too deeply");
        }
        TmulError::MissingDocumentType { root } => {
            eprintln!("  Root element <{}> has no 'type' attribute", root);
            eprintln!("    Add type=\"{}\" to the root element", document::DOCUMENT_TYPE);
        }
        TmulError::UnsupportedDocumentType { found, expected } => {
            eprintln!("  Unsupported document type '{}':", found);
            eprintln!("    Expected: {}", expected);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
