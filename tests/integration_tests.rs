//! Integration tests for the whole front end.
//!
//! These tests drive the public API from source text through scanning,
//! parsing and type checking, and check the files written by the
//! diagnostic dumper.

use std::{env, fs, path::PathBuf};

use pretty_assertions::assert_eq;
use xi::{
    diagnostic::{dump, format_token, output_path, run_file, Stage},
    errors::errors::{ErrorImpl, ErrorPhase},
    lexer::lexer::tokenize,
    parser::parser::{parse_file, Mode},
    type_checker::type_checker::type_check,
    Position,
};

const FIZZ: &str = "use io
use conv

// prints 1 to n, replacing multiples of three
main(args: int[][]) {
	n: int, ok: bool = parseInt(args[0])
	if (!ok) {
		println(\"usage: fizz <n>\")
		return
	}
	i: int = 1
	while (i <= n) {
		line: int[] = unparseInt(i)
		if (i % 3 == 0) {
			line = \"fizz\"
		}
		println(line)
		i = i + 1
	}
}
";

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("xi-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir should be writable");

    let path = dir.join(name);
    fs::write(&path, contents).expect("source should be written");
    path
}

#[test]
fn test_pipeline_accepts_program() {
    let tokens = tokenize(FIZZ);
    assert!(tokens.iter().all(|token| !token.is_error()));
    assert!(tokens.last().is_some_and(|token| token.is_eof()));

    let file = parse_file("fizz.xi", FIZZ, Mode::empty()).expect("program should parse");
    assert_eq!(file.uses.len(), 2);
    assert_eq!(file.funcs.len(), 1);

    let checker = type_check(&file).expect("program should type check");
    let main = checker.lookup("main").expect("main is declared");
    assert_eq!(main.ty.to_string(), "function (int[][]) ()");
}

#[test]
fn test_pipeline_reports_first_error() {
    let source = "main() {\n\tx: int = 1\n\ty: bool = x\n\tz: int = true\n}";
    let file = parse_file("bad.xi", source, Mode::empty()).expect("source should parse");

    let error = type_check(&file).expect_err("y is not an int");
    assert_eq!(error.phase(), ErrorPhase::Semantic);
    assert_eq!(error.get_position(), Some(Position::new(3, 12)));
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::TypeMismatch {
            expected: String::from("bool"),
            found: String::from("int"),
        }
    );
}

#[test]
fn test_syntax_error_stops_pipeline() {
    let error = parse_file("bad.xi", "main() { x = }", Mode::empty()).expect_err("missing rhs");
    assert_eq!(error.phase(), ErrorPhase::Syntax);
    assert_eq!(error.get_file(), Some("bad.xi"));
    assert_eq!(error.get_position(), Some(Position::new(1, 14)));
}

#[test]
fn test_token_lines() {
    let lines: Vec<String> = tokenize("x: int = 'a'\nprint(\"hi\", 42)")
        .iter()
        .filter(|token| !token.is_eof())
        .map(format_token)
        .collect();

    assert_eq!(
        lines,
        vec![
            "1:1 id x",
            "1:2 :",
            "1:4 int",
            "1:8 =",
            "1:10 character a",
            "2:1 id print",
            "2:6 (",
            "2:7 string hi",
            "2:11 ,",
            "2:13 integer 42",
            "2:15 )",
        ]
    );
}

#[test]
fn test_lex_dump_stops_at_error() {
    let mut out = Vec::new();
    let error = dump(Stage::Lex, "bad.xi", "a @ b", Mode::empty(), &mut out)
        .expect_err("@ is not a token");

    assert_eq!(error.phase(), ErrorPhase::Lexical);
    assert_eq!(error.get_file(), Some("bad.xi"));
    assert_eq!(
        String::from_utf8(out).expect("dump is utf-8"),
        "1:1 id a\n1:3 unexpected token: U+0040 '@'\n"
    );
}

#[test]
fn test_typecheck_dump() {
    let mut out = Vec::new();
    dump(Stage::Typecheck, "fizz.xi", FIZZ, Mode::empty(), &mut out).expect("valid program");
    assert_eq!(String::from_utf8(out).expect("utf-8"), "Valid Xi Program\n");

    let mut out = Vec::new();
    dump(
        Stage::Typecheck,
        "bad.xi",
        "main() { x: int = true }",
        Mode::empty(),
        &mut out,
    )
    .expect_err("bool is not int");
    assert_eq!(
        String::from_utf8(out).expect("utf-8"),
        "bad.xi:1:19: semantic error: types do not match: expected int, found bool\n"
    );
}

#[test]
fn test_output_paths() {
    let path = PathBuf::from("dir/sort.xi");
    assert_eq!(output_path(&path, Stage::Lex), PathBuf::from("dir/sort.lexed"));
    assert_eq!(output_path(&path, Stage::Parse), PathBuf::from("dir/sort.parsed"));
    assert_eq!(output_path(&path, Stage::Typecheck), PathBuf::from("dir/sort.typed"));
}

#[test]
fn test_run_file_writes_sibling_files() {
    let path = scratch_file("fizz.xi", FIZZ);

    let lexed = run_file(Stage::Lex, Mode::empty(), &path).expect("lexing succeeds");
    assert_eq!(lexed, path.with_extension("lexed"));
    let contents = fs::read_to_string(&lexed).expect("lexed file exists");
    assert_eq!(contents.lines().next(), Some("1:1 use"));
    assert!(contents.contains("6:2 id n"));

    let parsed = run_file(Stage::Parse, Mode::empty(), &path).expect("parsing succeeds");
    let contents = fs::read_to_string(&parsed).expect("parsed file exists");
    assert!(contents.starts_with("File {"));
    assert!(contents.contains("\"parseInt\""));

    let typed = run_file(Stage::Typecheck, Mode::empty(), &path).expect("checking succeeds");
    assert_eq!(
        fs::read_to_string(&typed).expect("typed file exists"),
        "Valid Xi Program\n"
    );
}

#[test]
fn test_run_file_records_parse_error() {
    let path = scratch_file("broken.xi", "use io\nmain() {\n\tif x {}\n");

    let error = run_file(Stage::Parse, Mode::empty(), &path).expect_err("unclosed block");
    assert_eq!(error.phase(), ErrorPhase::Syntax);

    let contents = fs::read_to_string(path.with_extension("parsed")).expect("parsed file exists");
    assert_eq!(contents, format!("{}\n", error));
}
