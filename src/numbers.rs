//! 数値ファイルの読み書き
//!
//! 1行に1つの10進整数を書いたテキスト形式を扱う。

/// 空白区切りの整数列を読み取る
///
/// 整数として読めないトークンに到達した時点で読み取りを終了する（エラーにはしない）。
/// `12abc` のように数値で始まるトークンは先頭の数値部分だけを採用し、そこで終了する。
pub fn parse_numbers(input: &str) -> Vec<i32> {
    let mut numbers = Vec::new();

    for token in input.split_whitespace() {
        let prefix_len = numeric_prefix_len(token);
        match token[..prefix_len].parse::<i32>() {
            Ok(value) => numbers.push(value),
            Err(_) => {
                log::debug!("stopped parsing at token {:?}", token);
                break;
            }
        }

        if prefix_len < token.len() {
            log::debug!("stopped parsing after numeric prefix of {:?}", token);
            break;
        }
    }

    numbers
}

/// 符号と数字からなる先頭部分のバイト長
fn numeric_prefix_len(token: &str) -> usize {
    let bytes = token.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = bytes[sign..].iter().take_while(|b| b.is_ascii_digit()).count();

    if digits == 0 {
        0
    } else {
        sign + digits
    }
}

/// バイト列から整数列を読み取る
///
/// UTF-8 として読める先頭部分だけを対象にする。不正なバイト列は
/// 数値として読めないトークンと同じく、そこで読み取りを終了する。
pub fn parse_number_bytes(input: &[u8]) -> Vec<i32> {
    let text = match std::str::from_utf8(input) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("stopped parsing at invalid UTF-8 byte offset {}", e.valid_up_to());
            // valid_up_to() までは UTF-8 として検証済み
            std::str::from_utf8(&input[..e.valid_up_to()]).unwrap_or_default()
        }
    };
    parse_numbers(text)
}

/// 隣接する全ての組が非減少であるか
pub fn is_sorted(numbers: &[i32]) -> bool {
    numbers.windows(2).all(|pair| pair[0] <= pair[1])
}
