use pretty_assertions::assert_eq;

use hex2coe_rs::hexfile::render_hex;
use hex2coe_rs::{convert_lines, parse_coe, render, write_coe_file, ConvertConfig, ConvertError, NOP_WORD};

fn cfg(depth: usize) -> ConvertConfig {
    ConvertConfig::new(depth, NOP_WORD).unwrap()
}

#[test]
fn render_small_image() {
    let conv = convert_lines(["@00000000", "33 00 00 00", "@0000000C", "EF BE AD DE"], &cfg(4)).unwrap();
    let expected = "\
memory_initialization_radix=16;
memory_initialization_vector=
00000033,
00000033,
00000033,
deadbeef;
";
    assert_eq!(render(&conv.image), expected);
}

#[test]
fn output_has_exactly_depth_lines() {
    for depth in [1usize, 3, 2048] {
        let conv = convert_lines(["01 02 03 04 05 06 07 08"], &cfg(depth)).unwrap();
        let text = render(&conv.image);
        let body: Vec<&str> = text.lines().skip(2).collect();
        assert_eq!(body.len(), depth);
        assert!(body[..depth - 1].iter().all(|l| l.len() == 9 && l.ends_with(',')));
        assert!(body[depth - 1].ends_with(';'));
    }
}

#[test]
fn coe_words_decode_back_to_input_bytes() {
    let bytes: [[u8; 4]; 3] = [[0x13, 0x05, 0x00, 0x00], [0xEF, 0xBE, 0xAD, 0xDE], [0x00, 0xFF, 0x80, 0x7F]];
    let line = bytes
        .iter()
        .flatten()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    let conv = convert_lines([line.as_str()], &cfg(3)).unwrap();
    let coe = parse_coe(&render(&conv.image)).unwrap();
    assert_eq!(coe.radix, 16);
    for (word, original) in coe.words.iter().zip(bytes.iter()) {
        assert_eq!(&word.to_le_bytes(), original);
    }
}

#[test]
fn conversion_is_idempotent() {
    let lines = ["@00000008", "01 02 03 04 05", "xx yy zz ww", "@40", "AA BB CC DD"];
    let a = render(&convert_lines(lines, &cfg(8)).unwrap().image);
    let b = render(&convert_lines(lines, &cfg(8)).unwrap().image);
    assert_eq!(a, b);
}

#[test]
fn hex_export_reconverts_to_same_image() {
    let lines = ["@00000004", "13 05 00 00 93 05 10 00 B3 85 A5 00 73 00 10 00 6F 00 00 00", "@00000040", "EF BE AD DE"];
    let first = convert_lines(lines, &cfg(32)).unwrap().image;
    let text = render_hex(&first);
    let second = convert_lines(text.lines(), &cfg(32)).unwrap().image;
    assert_eq!(first.words(), second.words());
}

#[test]
fn write_file_and_overwrite() {
    let dir = std::env::temp_dir().join("hex2coe_write_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("game.coe");
    std::fs::write(&path, "stale").unwrap();

    let conv = convert_lines(["78 56 34 12"], &cfg(2)).unwrap();
    write_coe_file(&path, &conv.image).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, render(&conv.image));
    assert!(text.contains("12345678,\n00000033;\n"));
    assert!(!dir.join("game.coe.tmp").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_into_missing_directory_fails() {
    let path = std::env::temp_dir().join("hex2coe_no_such_dir").join("out.coe");
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
    let conv = convert_lines(["00 00 00 00"], &cfg(1)).unwrap();
    let res = write_coe_file(&path, &conv.image);
    assert!(matches!(res, Err(ConvertError::Write { .. })));
    assert!(!path.exists());
}
