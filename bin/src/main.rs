use anyhow::{Context, Result};
use cbor_data::{
    event::SemanticTag,
    msgpack::MsgPackParser,
    parser::CborParser,
    sink::EventSink,
    source::SliceSource,
    typed_array::TypedArray,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::{fs, io::stdin, io::Read};

#[derive(Parser, Debug)]
#[clap(name = "cbor-stream-cli", about = "Decode a CBOR or MessagePack file and print its event stream")]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Emit tracing spans (container frame pushes/pops, latched errors) to stderr.
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a file (or stdin, with `-`) and print one line per emitted event.
    Decode {
        /// Input file; use "-" for stdin.
        path: String,

        #[clap(short, long, value_enum, default_value = "cbor")]
        format: Format,

        /// Render datetime-tagged values without their surrounding quotes/tag noise.
        #[clap(short, long)]
        pretty: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Cbor,
    Msgpack,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.verbose {
        tracing_subscriber::fmt().with_env_filter("trace").init();
    }

    match args.command {
        Command::Decode { path, format, pretty } => {
            let bytes = read_input(&path)?;
            let mut sink = PrintSink { depth: 0, pretty };
            match format {
                Format::Cbor => {
                    let mut parser = CborParser::new(SliceSource::new(&bytes));
                    parser.parse(&mut sink).context("decoding CBOR input")?;
                }
                Format::Msgpack => {
                    let mut parser = MsgPackParser::new(SliceSource::new(&bytes));
                    parser.parse(&mut sink).context("decoding MessagePack input")?;
                }
            }
        }
    }
    Ok(())
}

fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        stdin().read_to_end(&mut buf).context("reading stdin")?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("opening input file `{path}`"))
    }
}

/// Prints one indented line per event; the natural CLI surface for a streaming decoder.
struct PrintSink {
    depth: usize,
    pretty: bool,
}

impl PrintSink {
    fn indent(&self) {
        print!("{}", "  ".repeat(self.depth));
    }

    fn format_tagged_text(&self, value: &str, tag: SemanticTag) -> String {
        if self.pretty && matches!(tag, SemanticTag::DateTime) {
            return value.to_string();
        }
        format!("{value:?} ({tag:?})")
    }
}

impl EventSink for PrintSink {
    fn begin_array(&mut self, length: Option<u64>, tag: SemanticTag) -> bool {
        self.indent();
        match length {
            Some(n) => println!("BeginArray(len={n}, tag={tag:?})"),
            None => println!("BeginArray(indefinite, tag={tag:?})"),
        }
        self.depth += 1;
        true
    }
    fn end_array(&mut self) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        println!("EndArray");
        true
    }
    fn begin_object(&mut self, length: Option<u64>, tag: SemanticTag) -> bool {
        self.indent();
        match length {
            Some(n) => println!("BeginObject(len={n}, tag={tag:?})"),
            None => println!("BeginObject(indefinite, tag={tag:?})"),
        }
        self.depth += 1;
        true
    }
    fn end_object(&mut self) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        println!("EndObject");
        true
    }
    fn name(&mut self, name: &str) -> bool {
        self.indent();
        println!("Name({name:?})");
        true
    }
    fn string_value(&mut self, value: &str, tag: SemanticTag) -> bool {
        self.indent();
        println!("String({})", self.format_tagged_text(value, tag));
        true
    }
    fn byte_string_value(&mut self, value: &[u8], tag: SemanticTag) -> bool {
        self.indent();
        let rendered = match tag {
            SemanticTag::Base64 => base64::encode_config(value, base64::STANDARD),
            SemanticTag::Base64Url => base64::encode_config(value, base64::URL_SAFE_NO_PAD),
            SemanticTag::Base16 => value.iter().map(|b| format!("{b:02x}")).collect(),
            _ => format!("{value:02x?}"),
        };
        println!("ByteString({rendered}, {tag:?})");
        true
    }
    fn int64_value(&mut self, value: i64, tag: SemanticTag) -> bool {
        self.indent();
        println!("Int64({value}, {tag:?})");
        true
    }
    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> bool {
        self.indent();
        println!("UInt64({value}, {tag:?})");
        true
    }
    fn double_value(&mut self, value: f64, tag: SemanticTag) -> bool {
        self.indent();
        println!("Double({value}, {tag:?})");
        true
    }
    fn bool_value(&mut self, value: bool, tag: SemanticTag) -> bool {
        self.indent();
        println!("Bool({value}, {tag:?})");
        true
    }
    fn null_value(&mut self, tag: SemanticTag) -> bool {
        self.indent();
        println!("Null({tag:?})");
        true
    }
    fn typed_array(&mut self, array: &TypedArray) -> bool {
        self.indent();
        println!("TypedArray(len={})", array.len());
        true
    }
    fn ext_value(&mut self, type_id: i8, value: &[u8]) -> bool {
        self.indent();
        println!("Ext(type={type_id}, len={})", value.len());
        true
    }
    fn flush(&mut self) {}
}
