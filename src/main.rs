//! chordsheet CLI - parse, convert, transpose and render chords from the shell

use clap::{Parser, Subcommand};
use std::fs;
use std::process::ExitCode;

use chordsheet::{
    get_capos, get_keys, render_chord, Chord, ChordError, ChordType, Key, Line,
    NormalizeOptions, RenderOptions, Song,
};

/// Chord and key notation tool
#[derive(Parser, Debug)]
#[command(name = "chordsheet")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show how a chord is read
    Parse {
        chord: String,
    },

    /// Move a chord by a number of semitones
    Transpose {
        chord: String,

        #[arg(allow_negative_numbers = true)]
        semitones: i32,
    },

    /// Convert a chord to another notation (symbol, numeral, number, solfege)
    Convert {
        chord: String,

        target: ChordType,

        /// Song key the relative notations are measured from
        #[arg(short, long)]
        key: Option<Key>,
    },

    /// Normalize spelling and suffix
    Normalize {
        chord: String,

        /// Spell sharps and flats the way this key does
        #[arg(short, long)]
        key: Option<Key>,

        /// Leave the suffix as written
        #[arg(long)]
        keep_suffix: bool,
    },

    /// Render chords for a song described by a YAML metadata file
    Render {
        /// Metadata file (key, capo, chord-style)
        metadata: String,

        #[arg(required = true)]
        chords: Vec<String>,

        /// Show the song in this key
        #[arg(long)]
        render_key: Option<Key>,

        /// Local key of the line the chords are on
        #[arg(long)]
        line_key: Option<Key>,

        /// Target key or semitone count for the line
        #[arg(long)]
        transpose_key: Option<String>,

        /// Use ♯ and ♭
        #[arg(long)]
        unicode: bool,

        /// Print chords without normalizing them
        #[arg(long)]
        no_normalize: bool,
    },

    /// List capo positions and the key played at each
    Capos {
        key: Key,
    },

    /// List the keys a song can be transposed to
    Keys {
        key: Key,
    },
}

fn run(command: Commands) -> Result<(), ChordError> {
    match command {
        Commands::Parse { chord } => {
            let chord = Chord::parse_or_fail(&chord)?;
            let notation = ChordType::ALL
                .into_iter()
                .find(|chord_type| chord.is(*chord_type))
                .map_or("none", ChordType::as_str);
            println!("notation: {}", notation);
            println!("root:     {}", chord.root().map(Key::to_string).unwrap_or_default());
            println!("suffix:   {}", chord.suffix().unwrap_or(""));
            println!("bass:     {}", chord.bass().map(Key::to_string).unwrap_or_default());
            println!("minor:    {}", chord.is_minor());
        }
        Commands::Transpose { chord, semitones } => {
            println!("{}", Chord::parse_or_fail(&chord)?.transpose(semitones));
        }
        Commands::Convert { chord, target, key } => {
            let chord = Chord::parse_or_fail(&chord)?;
            println!("{}", chord.convert(target, key.as_ref())?);
        }
        Commands::Normalize {
            chord,
            key,
            keep_suffix,
        } => {
            let options = NormalizeOptions {
                normalize_suffix: !keep_suffix,
            };
            println!("{}", Chord::parse_or_fail(&chord)?.normalize(key.as_ref(), options));
        }
        Commands::Render {
            metadata,
            chords,
            render_key,
            line_key,
            transpose_key,
            unicode,
            no_normalize,
        } => {
            let content = fs::read_to_string(&metadata).map_err(|e| {
                ChordError::Metadata(format!("can't read '{}': {}", metadata, e))
            })?;
            let song = Song::from_yaml(&content)?;
            let line = Line {
                key: line_key,
                transpose_key,
            };
            let options = RenderOptions {
                render_key,
                use_unicode_modifier: unicode,
                normalize_chords: !no_normalize,
            };

            let rendered: Vec<String> = chords
                .iter()
                .map(|text| render_chord(text, &line, &song, &options))
                .collect();
            println!("{}", rendered.join(" "));
        }
        Commands::Capos { key } => {
            for (capo, effective) in get_capos(&key)? {
                println!("{:>2}  {}", capo, effective);
            }
        }
        Commands::Keys { key } => {
            println!("{}", get_keys(&key)?.join(" "));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_transpose_with_negative_semitones() {
        let cli = Cli::try_parse_from(["chordsheet", "transpose", "A#", "-1"]).unwrap();
        match cli.command {
            Commands::Transpose { chord, semitones } => {
                assert_eq!(chord, "A#");
                assert_eq!(semitones, -1);
            }
            other => panic!("expected transpose, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_convert_reads_typed_arguments() {
        let cli =
            Cli::try_parse_from(["chordsheet", "convert", "#4", "numeral", "--key", "E"]).unwrap();
        match cli.command {
            Commands::Convert { target, key, .. } => {
                assert_eq!(target, ChordType::Numeral);
                assert_eq!(key.map(|k| k.to_string()).as_deref(), Some("E"));
            }
            other => panic!("expected convert, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_render_options() {
        let cli = Cli::try_parse_from([
            "chordsheet",
            "render",
            "song.yml",
            "C",
            "G/B",
            "--transpose-key",
            "2",
            "--unicode",
            "--no-normalize",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                chords,
                transpose_key,
                unicode,
                no_normalize,
                render_key,
                ..
            } => {
                assert_eq!(chords, ["C", "G/B"]);
                assert_eq!(transpose_key.as_deref(), Some("2"));
                assert!(unicode);
                assert!(no_normalize);
                assert!(render_key.is_none());
            }
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Cli::try_parse_from(["chordsheet", "convert", "A", "tab"]).is_err());
        assert!(Cli::try_parse_from(["chordsheet", "capos", "H"]).is_err());
        assert!(Cli::try_parse_from(["chordsheet", "render", "song.yml"]).is_err());
        assert!(Cli::try_parse_from(["chordsheet", "render", "song.yml", "C", "--line-key"]).is_err());
    }

    #[test]
    fn test_run_reports_chord_errors() {
        let result = run(Commands::Transpose {
            chord: "not a chord".to_string(),
            semitones: 1,
        });
        assert!(matches!(result, Err(ChordError::Parse { .. })));
    }
}
