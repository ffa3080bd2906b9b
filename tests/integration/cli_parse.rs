use clap::{CommandFactory, Parser};
use drivefold::tooling::cli::{Cli, Commands};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["drivefold", "tree", "abc123"],
        vec!["drivefold", "tree", "abc123", "--top-level-only", "--format", "json"],
        vec!["drivefold", "collect", "abc123", "--format", "markdown"],
        vec!["drivefold", "aggregate", "https://drive.google.com/drive/folders/abc123"],
        vec!["drivefold", "sections", "abc123", "Shots", "--format", "json"],
        vec!["drivefold", "media", "abc123", "--size", "800"],
        vec!["drivefold", "link", "https://drive.google.com/file/d/abc/view", "--video"],
        vec!["drivefold", "history", "abc", "cropped 1:1"],
        vec!["drivefold", "crop", "photo.jpg", "--ratio", "16:9", "--center", "100,80"],
        vec!["drivefold", "--workspace", "/tmp/ws", "--log-level", "debug", "tree", "x"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_input() {
    assert!(Cli::try_parse_from(["drivefold"]).is_err());
    assert!(Cli::try_parse_from(["drivefold", "tree"]).is_err());
    assert!(Cli::try_parse_from(["drivefold", "crop", "a.jpg", "--center", "10"]).is_err());
    assert!(Cli::try_parse_from(["drivefold", "media", "x", "--size", "big"]).is_err());
}

#[test]
fn crop_defaults() {
    let cli = Cli::try_parse_from(["drivefold", "crop", "a.jpg"]).unwrap();
    match cli.command {
        Commands::Crop {
            ratio,
            center,
            output,
            record,
            ..
        } => {
            assert_eq!(ratio, "1:1");
            assert_eq!(center, None);
            assert_eq!(output, "crop");
            assert!(!record);
        }
        _ => panic!("expected crop command"),
    }
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn crop_rect_parses_and_excludes_center() {
    let cli = Cli::try_parse_from(["drivefold", "crop", "a.jpg", "--rect", "1,2,30,40"]).unwrap();
    match cli.command {
        Commands::Crop { rect, .. } => {
            let rect = rect.unwrap();
            assert_eq!((rect.left, rect.top, rect.width, rect.height), (1, 2, 30, 40));
        }
        _ => panic!("expected crop command"),
    }
    assert!(Cli::try_parse_from(["drivefold", "crop", "a.jpg", "--rect", "1,2,30"]).is_err());
    assert!(Cli::try_parse_from([
        "drivefold", "crop", "a.jpg", "--rect", "1,2,3,4", "--center", "5,5"
    ])
    .is_err());
}
