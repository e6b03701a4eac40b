//! 命令行交互
//!
//! 输入源是泛型的 `AsyncBufRead`，运行时接 stdin，测试时接字节串

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::AppResult;

/// 解析 是/否 回答，空输入取默认值，无法识别返回 `None`
pub fn parse_yes_no(input: &str, default: bool) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" | "是" | "好" => Some(true),
        "n" | "no" | "否" | "不" => Some(false),
        _ => None,
    }
}

/// 读取一行，输入结束（Ctrl-D）时返回 `None`
async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R, message: &str) -> AppResult<Option<String>> {
    print!("? {} ", message);
    std::io::stdout().flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        println!();
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// 是/否 确认，无法识别时重新询问
pub async fn confirm<R: AsyncBufRead + Unpin>(reader: &mut R, message: &str, default: bool) -> AppResult<Option<bool>> {
    let hint = if default { "(Y/n)" } else { "(y/N)" };
    loop {
        let Some(line) = read_line(reader, &format!("{} {}", message, hint)).await? else {
            return Ok(None);
        };
        match parse_yes_no(&line, default) {
            Some(answer) => return Ok(Some(answer)),
            None => println!("  请输入 y 或 n"),
        }
    }
}

/// 读取一行自由文本（已去除首尾空白）
pub async fn ask_text<R: AsyncBufRead + Unpin>(reader: &mut R, message: &str) -> AppResult<Option<String>> {
    Ok(read_line(reader, message).await?.map(|s| s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes_no() {
        assert_eq!(parse_yes_no("", true), Some(true));
        assert_eq!(parse_yes_no("  ", false), Some(false));
        assert_eq!(parse_yes_no("Y", false), Some(true));
        assert_eq!(parse_yes_no("no", true), Some(false));
        assert_eq!(parse_yes_no("是", false), Some(true));
        assert_eq!(parse_yes_no("maybe", true), None);
    }

    #[tokio::test]
    async fn test_confirm_reasks_until_valid() {
        let mut input: &[u8] = b"maybe\nn\n";
        assert_eq!(confirm(&mut input, "继续？", true).await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_confirm_eof_cancels() {
        let mut input: &[u8] = b"";
        assert_eq!(confirm(&mut input, "继续？", true).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ask_text_trims() {
        let mut input: &[u8] = "  第二章 \r\n".as_bytes();
        assert_eq!(ask_text(&mut input, "从哪个开始做？").await.unwrap().as_deref(), Some("第二章"));
    }
}
