//! Rendering of a counter value in the OOXML `w:numFmt` vocabulary.

const ROMAN: &[(u32, &str)] = &[
    (1000, "m"),
    (900, "cm"),
    (500, "d"),
    (400, "cd"),
    (100, "c"),
    (90, "xc"),
    (50, "l"),
    (40, "xl"),
    (10, "x"),
    (9, "ix"),
    (5, "v"),
    (4, "iv"),
    (1, "i"),
];

/// Subtractive roman numerals for 1..=3999; anything else is rendered as
/// plain decimal.
pub fn number_to_roman(n: u32, upper: bool) -> String {
    if n == 0 || n > 3999 {
        return n.to_string();
    }
    let mut rest = n;
    let mut result = String::new();
    for &(value, numeral) in ROMAN {
        while rest >= value {
            result.push_str(numeral);
            rest -= value;
        }
    }
    if upper {
        result.make_ascii_uppercase();
    }
    result
}

/// Bijective base-26: 1 → `a`, 26 → `z`, 27 → `aa`. Zero yields an empty string.
pub fn number_to_letters(n: u32) -> String {
    if n == 0 {
        return String::new();
    }
    let mut n = n - 1;
    let mut result = Vec::new();
    loop {
        result.push(b'a' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];
const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// English words for 0..=99, decimal beyond that.
pub fn cardinal_text(n: u32) -> String {
    match n {
        0..=19 => ONES[n as usize].to_string(),
        20..=99 => {
            let tens = TENS[(n / 10) as usize];
            match n % 10 {
                0 => tens.to_string(),
                unit => format!("{tens}-{}", ONES[unit as usize]),
            }
        }
        _ => n.to_string(),
    }
}

/// English ordinal words for 1..=99, numeric ordinal beyond that.
pub fn ordinal_text(n: u32) -> String {
    fn ordinal_word(word: &str) -> String {
        match word {
            "one" => "first".into(),
            "two" => "second".into(),
            "three" => "third".into(),
            "five" => "fifth".into(),
            "eight" => "eighth".into(),
            "nine" => "ninth".into(),
            "twelve" => "twelfth".into(),
            w if w.ends_with('y') => format!("{}ieth", &w[..w.len() - 1]),
            w => format!("{w}th"),
        }
    }
    if n == 0 || n > 99 {
        return ordinal(n);
    }
    let words = cardinal_text(n);
    match words.rsplit_once('-') {
        Some((head, last)) => format!("{head}-{}", ordinal_word(last)),
        None => ordinal_word(&words),
    }
}

const KOREAN_DIGITS: [char; 10] = ['영', '일', '이', '삼', '사', '오', '육', '칠', '팔', '구'];
const CHINESE_DIGITS: [char; 10] = ['〇', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
const GANADA: [char; 14] = [
    '가', '나', '다', '라', '마', '바', '사', '아', '자', '차', '카', '타', '파', '하',
];
const CHOSUNG: [char; 14] = [
    'ㄱ', 'ㄴ', 'ㄷ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅅ', 'ㅇ', 'ㅈ', 'ㅊ', 'ㅋ', 'ㅌ', 'ㅍ', 'ㅎ',
];

fn single_digit(n: u32, digits: &[char; 10]) -> String {
    match digits.get(n as usize) {
        Some(c) => c.to_string(),
        None => n.to_string(),
    }
}

fn from_table(n: u32, table: &[char]) -> String {
    match n.checked_sub(1).and_then(|i| table.get(i as usize)) {
        Some(c) => c.to_string(),
        None => n.to_string(),
    }
}

fn enclosed_circle(n: u32) -> String {
    match n {
        1..=20 => char::from_u32(0x2460 + n - 1)
            .map(String::from)
            .unwrap_or_else(|| n.to_string()),
        _ => n.to_string(),
    }
}

/// Render `value` in the given `w:numFmt`. Unknown formats and negative
/// values render as decimal; `none` and `bullet` render as nothing.
pub fn format_number(value: i64, fmt: &str) -> String {
    let Ok(n) = u32::try_from(value) else {
        return value.to_string();
    };
    match fmt {
        "decimal" => n.to_string(),
        "decimalZero" => format!("{n:02}"),
        "lowerLetter" => number_to_letters(n),
        "upperLetter" => number_to_letters(n).to_ascii_uppercase(),
        "lowerRoman" => number_to_roman(n, false),
        "upperRoman" => number_to_roman(n, true),
        "ordinal" => ordinal(n),
        "cardinalText" => cardinal_text(n),
        "ordinalText" => ordinal_text(n),
        "hex" => format!("{n:X}"),
        "binary" => format!("{n:b}"),
        "decimalEnclosedCircle" | "decimalEnclosedCircleChinese" => enclosed_circle(n),
        "koreanDigital" | "koreanCounting" | "koreanDigital2" | "koreanLegal" => {
            single_digit(n, &KOREAN_DIGITS)
        }
        "chineseCounting" | "chineseCountingThousand" | "chineseLegalSimplified"
        | "chineseNum" | "ideographDigital" | "japaneseCounting" | "taiwaneseCounting"
        | "taiwaneseDigital" => single_digit(n, &CHINESE_DIGITS),
        "ganada" => from_table(n, &GANADA),
        "chosung" => from_table(n, &CHOSUNG),
        "none" | "bullet" => String::new(),
        _ => n.to_string(),
    }
}

/// Map the legacy Symbol/Wingdings private-use bullets Word writes to
/// their Unicode equivalents. Other characters pass through.
pub fn normalize_bullet(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{f0b7}' => '\u{2022}', // •
            '\u{f0d8}' => '\u{27a2}', // ➢
            '\u{f0a7}' => '\u{25aa}', // ▪
            '\u{f0fc}' => '\u{2713}', // ✓
            other => other,
        })
        .collect()
}
