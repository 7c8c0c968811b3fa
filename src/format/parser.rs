//! FormatParser Module
//!
//! Excel Number Format Stringの構文解析と適用を提供します。

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::api::SectionPolicy;
use crate::error::XlsxTableError;

use super::sections::{split_sections, FormatSection, SectionKind};
use super::tokens::{FormatToken, Placeholder};

/// 1日の秒数
pub(crate) const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number Format Stringパーサー
///
/// Excel Number Format Stringを解析し、数値をフォーマットします。
#[derive(Debug, Clone)]
pub(crate) struct FormatParser {
    /// 元のフォーマット文字列
    pattern: String,

    /// パースされたセクション（1〜4個）
    sections: Vec<FormatSection>,
}

impl FormatParser {
    /// フォーマット文字列をパース
    ///
    /// 各セクションについて、フィラー指定（`_x`, `*x`）を除去してからトークンに分解します。
    /// 解析自体は失敗しません。解釈できない文字はリテラルとして扱います。
    pub fn parse(pattern: &str) -> Self {
        let sections = split_sections(pattern)
            .iter()
            .enumerate()
            .filter_map(|(idx, section_str)| {
                let kind = SectionKind::from_index(idx)?;
                Some(Self::parse_section(&Self::strip_fillers(section_str), kind))
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            sections,
        }
    }

    /// フィラー指定を除去
    ///
    /// `_`または`*`と、その直後の1文字を除去します。
    /// 直前のエスケープ文字（`\`）は考慮しないため、`\_`や`\*`も除去対象になります。
    /// 末尾の単独の`_`・`*`はそのまま残します。
    pub(crate) fn strip_fillers(section: &str) -> String {
        let mut result = String::with_capacity(section.len());
        let mut chars = section.chars();

        while let Some(ch) = chars.next() {
            if ch == '_' || ch == '*' {
                if chars.next().is_none() {
                    result.push(ch);
                }
                continue;
            }
            result.push(ch);
        }

        result
    }

    /// セクションをパース
    ///
    /// 引用符は区切りとしてのみ扱い、引用符自体は出力しません。
    /// 引用符で囲まれた内容はリテラルとしてそのまま残します。
    fn parse_section(section_str: &str, kind: SectionKind) -> FormatSection {
        let mut section = FormatSection::new(kind);
        let chars: Vec<char> = section_str.chars().collect();

        // 空の正数セクションは"General"と同じ扱い
        if chars.is_empty() {
            if section.kind == SectionKind::Positive {
                section.tokens.push(FormatToken::General);
            }
            return section;
        }

        let mut in_quotes = false;
        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];
            i += 1;

            if ch == '"' {
                in_quotes = !in_quotes;
                continue;
            }
            if in_quotes {
                Self::push_token(&mut section.tokens, FormatToken::Literal(ch.to_string()));
                continue;
            }

            let token = match ch {
                '\\' => match chars.get(i) {
                    // 引用符はエスケープされていても出力しない
                    Some('"') => {
                        i += 1;
                        continue;
                    }
                    Some(&next) => {
                        i += 1;
                        FormatToken::Literal(next.to_string())
                    }
                    None => FormatToken::Literal(ch.to_string()),
                },
                '[' => {
                    let close = chars[i..].iter().position(|&c| c == ']');
                    let end = close.map_or(chars.len(), |offset| i + offset);
                    let content: String = chars[i..end].iter().collect();
                    i = (end + 1).min(chars.len());
                    match Self::parse_bracket(&content) {
                        Some(token) => token,
                        None => continue,
                    }
                }
                '0' => FormatToken::Digit(Placeholder::Zero),
                '#' => FormatToken::Digit(Placeholder::Hash),
                '?' => FormatToken::Digit(Placeholder::Space),
                '.' => FormatToken::DecimalPoint,
                ',' => FormatToken::ThousandSeparator,
                '%' => FormatToken::Percent,
                '/' => FormatToken::Slash,
                '@' => FormatToken::TextPlaceholder,
                'E' | 'e' if matches!(chars.get(i), Some('+') | Some('-')) => {
                    let plus = chars[i] == '+';
                    i += 1;
                    FormatToken::Exponent {
                        plus,
                        upper: ch == 'E',
                    }
                }
                'G' | 'g' if Self::starts_with_ignore_case(&chars[i - 1..], "general") => {
                    i += "general".len() - 1;
                    FormatToken::General
                }
                'A' | 'a' if Self::starts_with_ignore_case(&chars[i - 1..], "am/pm") => {
                    i += "am/pm".len() - 1;
                    FormatToken::AmPm(true)
                }
                'A' | 'a' if Self::starts_with_ignore_case(&chars[i - 1..], "a/p") => {
                    i += "a/p".len() - 1;
                    FormatToken::AmPm(false)
                }
                'y' | 'Y' => FormatToken::Year(Self::count_run(&chars, &mut i, 'y') + 1),
                'm' | 'M' => FormatToken::Month(Self::count_run(&chars, &mut i, 'm') + 1),
                'd' | 'D' => FormatToken::Day(Self::count_run(&chars, &mut i, 'd') + 1),
                'h' | 'H' => FormatToken::Hour(Self::count_run(&chars, &mut i, 'h') + 1),
                's' | 'S' => FormatToken::Second(Self::count_run(&chars, &mut i, 's') + 1),
                _ => FormatToken::Literal(ch.to_string()),
            };
            Self::push_token(&mut section.tokens, token);
        }

        Self::resolve_minutes(&mut section.tokens);
        section
    }

    /// ブラケット内の内容を解析
    ///
    /// `[h]`, `[mm]`, `[ss]`は経過時間、英字で始まるものは色指定として扱います。
    /// ロケール指定（`[$-409]`）や条件（`[>100]`）は無視します。
    fn parse_bracket(content: &str) -> Option<FormatToken> {
        let lower = content.to_ascii_lowercase();
        let all = |target: char| !lower.is_empty() && lower.chars().all(|c| c == target);

        if all('h') {
            Some(FormatToken::ElapsedHours)
        } else if all('m') {
            Some(FormatToken::ElapsedMinutes)
        } else if all('s') {
            Some(FormatToken::ElapsedSeconds)
        } else if content.starts_with(char::is_alphabetic) {
            Some(FormatToken::Color(content.to_string()))
        } else {
            None
        }
    }

    /// トークンを追加（連続するリテラルは1つにまとめる）
    fn push_token(tokens: &mut Vec<FormatToken>, token: FormatToken) {
        if let FormatToken::Literal(ref text) = token {
            if let Some(FormatToken::Literal(prev)) = tokens.last_mut() {
                prev.push_str(text);
                return;
            }
        }
        tokens.push(token);
    }

    /// 連続する同じ文字をカウント（大文字小文字を区別しない）
    fn count_run(chars: &[char], i: &mut usize, target: char) -> usize {
        let mut count = 0;
        while chars.get(*i).is_some_and(|c| c.eq_ignore_ascii_case(&target)) {
            *i += 1;
            count += 1;
        }
        count
    }

    fn starts_with_ignore_case(chars: &[char], keyword: &str) -> bool {
        let keyword: Vec<char> = keyword.chars().collect();
        chars.len() >= keyword.len()
            && chars
                .iter()
                .zip(&keyword)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// "m"/"mm"を分に置き換える
    ///
    /// 直前の日時トークンが時、または直後の日時トークンが秒の場合は分として扱います。
    fn resolve_minutes(tokens: &mut [FormatToken]) {
        for idx in 0..tokens.len() {
            let count = match &tokens[idx] {
                FormatToken::Month(count) if *count <= 2 => *count,
                _ => continue,
            };

            let after_hour = tokens[..idx]
                .iter()
                .rev()
                .find(|t| t.is_datetime())
                .is_some_and(|t| matches!(t, FormatToken::Hour(_) | FormatToken::ElapsedHours));
            let before_second = tokens[idx + 1..]
                .iter()
                .find(|t| t.is_datetime())
                .is_some_and(|t| matches!(t, FormatToken::Second(_) | FormatToken::ElapsedSeconds));

            if after_hour || before_second {
                tokens[idx] = FormatToken::Minute(count);
            }
        }
    }

    /// セクション数
    #[cfg(test)]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// 値の符号に応じてセクションを選択
    ///
    /// 正数はセクション0、負数はセクション1、ゼロはセクション2を選択します。
    /// テキストセクション（セクション3）は選択しません。
    ///
    /// # 戻り値
    ///
    /// * `Ok((section, negative_sign))` - 選択されたセクションと、先頭に`-`を付けるかどうか
    /// * `Err(XlsxTableError::FormatSection)` - `SectionPolicy::Strict`でセクションが存在しない場合
    pub fn select_section(
        &self,
        value: f64,
        policy: SectionPolicy,
    ) -> Result<(&FormatSection, bool), XlsxTableError> {
        let index = if value > 0.0 {
            0
        } else if value < 0.0 {
            1
        } else {
            2
        };

        if let Some(section) = self.sections.get(index) {
            return Ok((section, false));
        }

        let missing = || XlsxTableError::FormatSection {
            pattern: self.pattern.clone(),
            section: index,
            available: self.sections.len(),
        };

        match policy {
            SectionPolicy::Strict => Err(missing()),
            // 負数セクションがなければ正数セクションに"-"を付け、ゼロセクションがなければ正数セクションを使う
            SectionPolicy::ExcelFallback => {
                let first = self.sections.first().ok_or_else(missing)?;
                Ok((first, index == 1))
            }
        }
    }

    /// 日付・時刻をフォーマット
    ///
    /// # 引数
    ///
    /// * `section` - フォーマットセクション
    /// * `datetime` - シリアル値から変換した日時
    /// * `serial` - 元のシリアル値（経過時間の算出に使用）
    pub fn format_datetime(
        &self,
        section: &FormatSection,
        datetime: NaiveDateTime,
        serial: f64,
    ) -> String {
        let twelve_hour = section
            .tokens
            .iter()
            .any(|t| matches!(t, FormatToken::AmPm(_)));
        let total_seconds = (serial * SECONDS_PER_DAY).round() as i64;

        let mut result = String::new();
        for token in &section.tokens {
            match token {
                FormatToken::Year(count) => {
                    let year = datetime.year();
                    if *count <= 2 {
                        result.push_str(&format!("{:02}", year.rem_euclid(100)));
                    } else {
                        result.push_str(&format!("{:04}", year));
                    }
                }
                FormatToken::Month(count) => match count {
                    1 | 2 => result.push_str(&Self::pad(datetime.month() as i64, *count)),
                    3 => result.push_str(&datetime.format("%b").to_string()),
                    4 => result.push_str(&datetime.format("%B").to_string()),
                    _ => result.extend(datetime.format("%B").to_string().chars().take(1)),
                },
                FormatToken::Day(count) => match count {
                    1 | 2 => result.push_str(&Self::pad(datetime.day() as i64, *count)),
                    3 => result.push_str(&datetime.format("%a").to_string()),
                    _ => result.push_str(&datetime.format("%A").to_string()),
                },
                FormatToken::Hour(count) => {
                    let hour = if twelve_hour {
                        match datetime.hour() % 12 {
                            0 => 12,
                            h => h,
                        }
                    } else {
                        datetime.hour()
                    };
                    result.push_str(&Self::pad(hour as i64, *count));
                }
                FormatToken::Minute(count) => {
                    result.push_str(&Self::pad(datetime.minute() as i64, *count));
                }
                FormatToken::Second(count) => {
                    result.push_str(&Self::pad(datetime.second() as i64, *count));
                }
                FormatToken::ElapsedHours => {
                    result.push_str(&total_seconds.div_euclid(3600).to_string());
                }
                FormatToken::ElapsedMinutes => {
                    result.push_str(&total_seconds.div_euclid(60).to_string());
                }
                FormatToken::ElapsedSeconds => {
                    result.push_str(&total_seconds.to_string());
                }
                FormatToken::AmPm(long) => {
                    let pm = datetime.hour() >= 12;
                    let marker = match (long, pm) {
                        (true, false) => "AM",
                        (true, true) => "PM",
                        (false, false) => "A",
                        (false, true) => "P",
                    };
                    result.push_str(marker);
                }
                // 秒未満は丸め済みのため常に0
                FormatToken::Digit(Placeholder::Zero) => result.push('0'),
                FormatToken::DecimalPoint => result.push('.'),
                FormatToken::ThousandSeparator => result.push(','),
                FormatToken::Percent => result.push('%'),
                FormatToken::Slash => result.push('/'),
                FormatToken::Literal(s) => result.push_str(s),
                _ => {
                    // その他のトークンは無視
                }
            }
        }

        result
    }

    fn pad(value: i64, count: usize) -> String {
        if count >= 2 {
            format!("{:02}", value)
        } else {
            value.to_string()
        }
    }

    /// 数値をフォーマット
    ///
    /// # 引数
    ///
    /// * `value` - フォーマットする数値（符号は`negative_sign`で指定）
    /// * `section` - フォーマットセクション
    /// * `negative_sign` - 先頭に`-`を付けるかどうか
    pub fn format_numeric(&self, value: f64, section: &FormatSection, negative_sign: bool) -> String {
        let abs_value = value.abs();

        if section.is_fraction() || section.is_datetime() {
            // 分数表記と、日付として扱わない日付・時刻書式は一般書式で出力
            return Self::with_sign(general_number(abs_value), negative_sign && abs_value != 0.0);
        }

        if section.is_general() {
            let mut result = String::new();
            for token in &section.tokens {
                match token {
                    FormatToken::General => result.push_str(&general_number(abs_value)),
                    FormatToken::Slash => result.push('/'),
                    FormatToken::Literal(s) => result.push_str(s),
                    _ => {}
                }
            }
            return Self::with_sign(result, negative_sign && abs_value != 0.0);
        }

        if !section.has_digits() {
            // 数字プレースホルダーがない場合はリテラルのみ出力
            let mut result = String::new();
            for token in &section.tokens {
                match token {
                    FormatToken::Literal(s) => result.push_str(s),
                    FormatToken::Slash => result.push('/'),
                    FormatToken::Percent => result.push('%'),
                    FormatToken::TextPlaceholder => result.push_str(&general_number(abs_value)),
                    _ => {}
                }
            }
            return result;
        }

        let layout = NumberLayout::from_tokens(&section.tokens);
        let scaled = abs_value * 100f64.powi(layout.percent_count)
            / 1000f64.powi(layout.scale_count);
        if !scaled.is_finite() {
            // 百分率の拡大で桁あふれした場合は一般書式で出力
            return Self::with_sign(general_number(abs_value), negative_sign);
        }
        let rendered = layout.render(scaled);

        // トークンを順に処理して結果を構築
        let mut result = String::new();
        let mut region = Region::Integer;
        let mut integer_done = false;
        let mut frac_pos = 0;

        for token in &section.tokens {
            match token {
                FormatToken::Digit(_) => match region {
                    Region::Integer => {
                        if !integer_done {
                            result.push_str(&rendered.integer);
                            integer_done = true;
                        }
                    }
                    Region::Fraction => {
                        if let Some(ch) = rendered.fraction.get(frac_pos) {
                            result.push(*ch);
                        }
                        frac_pos += 1;
                    }
                    Region::Exponent => {
                        // 指数部はExponentトークンでまとめて出力済み
                    }
                },
                FormatToken::DecimalPoint => {
                    if region == Region::Integer {
                        if !integer_done {
                            result.push_str(&rendered.integer);
                            integer_done = true;
                        }
                        region = Region::Fraction;
                    }
                    result.push('.');
                }
                FormatToken::Exponent { upper, .. } => {
                    if !integer_done {
                        result.push_str(&rendered.integer);
                        integer_done = true;
                    }
                    region = Region::Exponent;
                    result.push(if *upper { 'E' } else { 'e' });
                    result.push_str(&rendered.exponent);
                }
                FormatToken::Percent => result.push('%'),
                FormatToken::Slash => result.push('/'),
                FormatToken::Literal(s) => result.push_str(s),
                _ => {
                    // 千の位区切りは整数部に含まれている。色指定などは無視
                }
            }
        }

        Self::with_sign(result, negative_sign && rendered.is_nonzero())
    }

    fn with_sign(mut text: String, negative: bool) -> String {
        if negative {
            text.insert(0, '-');
        }
        text
    }
}

/// 一般書式（General）で数値を文字列に変換
///
/// 整数値は小数点なし、それ以外は往復可能な最短の10進表記で出力します。
/// 非常に大きい値と非常に小さい値は指数表記（例: `1.5E+20`）になります。
pub(crate) fn general_number(value: f64) -> String {
    if value == 0.0 {
        // -0.0を"0"として出力
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-9..1e15).contains(&magnitude) {
        let text = format!("{:E}", value);
        return match text.split_once('E') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}E+{}", mantissa, exponent)
            }
            _ => text,
        };
    }

    value.to_string()
}

/// 数値書式の領域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Integer,
    Fraction,
    Exponent,
}

/// 数値書式のレイアウト（プレースホルダーの配置）
#[derive(Debug, Default)]
struct NumberLayout {
    integer: Vec<Placeholder>,
    fraction: Vec<Placeholder>,
    exponent: Vec<Placeholder>,
    has_exponent: bool,
    /// 正の指数にも"+"を付けるかどうか
    exponent_plus: bool,
    thousands: bool,
    /// 整数部末尾のカンマの数（1つごとに1000で割る）
    scale_count: i32,
    percent_count: i32,
}

/// レイアウトに従って変換した数字列
#[derive(Debug)]
struct RenderedNumber {
    integer: String,
    fraction: Vec<char>,
    exponent: String,
}

impl RenderedNumber {
    fn is_nonzero(&self) -> bool {
        self.integer
            .chars()
            .chain(self.fraction.iter().copied())
            .any(|c| ('1'..='9').contains(&c))
    }
}

impl NumberLayout {
    fn from_tokens(tokens: &[FormatToken]) -> Self {
        let mut layout = NumberLayout::default();
        let mut region = Region::Integer;
        let mut pending_commas = 0;

        for token in tokens {
            match token {
                FormatToken::Digit(placeholder) => match region {
                    Region::Integer => {
                        if pending_commas > 0 && !layout.integer.is_empty() {
                            layout.thousands = true;
                        }
                        pending_commas = 0;
                        layout.integer.push(*placeholder);
                    }
                    Region::Fraction => layout.fraction.push(*placeholder),
                    Region::Exponent => layout.exponent.push(*placeholder),
                },
                FormatToken::ThousandSeparator
                    if region == Region::Integer && !layout.integer.is_empty() =>
                {
                    pending_commas += 1;
                }
                FormatToken::DecimalPoint if region == Region::Integer => {
                    layout.scale_count += pending_commas;
                    pending_commas = 0;
                    region = Region::Fraction;
                }
                FormatToken::Exponent { plus, .. } => {
                    if region == Region::Integer {
                        layout.scale_count += pending_commas;
                        pending_commas = 0;
                    }
                    layout.has_exponent = true;
                    layout.exponent_plus = *plus;
                    region = Region::Exponent;
                }
                FormatToken::Percent => layout.percent_count += 1,
                _ => {}
            }
        }

        if region == Region::Integer {
            layout.scale_count += pending_commas;
        }

        layout
    }

    fn render(&self, value: f64) -> RenderedNumber {
        let (mantissa, exponent) = if self.has_exponent {
            self.split_exponent(value)
        } else {
            (value, 0)
        };

        let text = self.round_to_text(mantissa);
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

        RenderedNumber {
            integer: self.format_integer(int_part),
            fraction: self.format_fraction(frac_part),
            exponent: if self.has_exponent {
                self.format_exponent(exponent)
            } else {
                String::new()
            },
        }
    }

    /// 小数部の桁数で四捨五入（0.5は0から遠い方へ丸める）
    fn round_to_text(&self, value: f64) -> String {
        round_decimal(value.abs(), self.fraction.len())
    }

    /// 仮数部と指数部に分解
    ///
    /// 指数は整数部のプレースホルダー数の倍数になります（`##0.0E+0`なら3の倍数）。
    fn split_exponent(&self, value: f64) -> (f64, i32) {
        if value == 0.0 {
            return (0.0, 0);
        }

        let step = self.integer.len().max(1) as i32;
        let mut exponent = decimal_exponent(value).div_euclid(step) * step;
        let mut mantissa = scale_by_power_of_ten(value, -exponent);

        // 丸めで桁が繰り上がった場合は指数を進める
        let limit = 10f64.powi(step);
        if self
            .round_to_text(mantissa)
            .parse::<f64>()
            .is_ok_and(|m| m >= limit)
        {
            exponent += step;
            mantissa = scale_by_power_of_ten(value, -exponent);
        }

        (mantissa, exponent)
    }

    fn format_integer(&self, int_part: &str) -> String {
        let zeros = self
            .integer
            .iter()
            .filter(|p| **p == Placeholder::Zero)
            .count();
        let spaces = self
            .integer
            .iter()
            .filter(|p| **p == Placeholder::Space)
            .count();

        let mut digits = int_part.trim_start_matches('0').to_string();
        while digits.len() < zeros {
            digits.insert(0, '0');
        }
        if self.thousands {
            digits = add_thousand_separators(&digits);
        }

        let digit_count = digits.chars().filter(|c| c.is_ascii_digit()).count();
        let width = zeros + spaces;
        if digit_count < width {
            digits.insert_str(0, &" ".repeat(width - digit_count));
        }
        digits
    }

    fn format_fraction(&self, frac_part: &str) -> Vec<char> {
        let mut chars: Vec<char> = frac_part.chars().collect();

        // 末尾の省略可能な桁（#, ?）のゼロを処理
        for (idx, placeholder) in self.fraction.iter().enumerate().rev() {
            if chars.get(idx) != Some(&'0') {
                break;
            }
            match placeholder {
                Placeholder::Hash => {
                    chars.truncate(idx);
                }
                Placeholder::Space => chars[idx] = ' ',
                Placeholder::Zero => break,
            }
        }

        chars
    }

    fn format_exponent(&self, exponent: i32) -> String {
        let width = self
            .exponent
            .iter()
            .filter(|p| **p == Placeholder::Zero)
            .count()
            .max(1);
        let sign = if exponent < 0 {
            "-"
        } else if self.exponent_plus {
            "+"
        } else {
            ""
        };
        format!("{}{:0width$}", sign, exponent.abs(), width = width)
    }
}

/// 有効数字15桁の10進数に直してから、小数第`decimals`位に四捨五入した文字列を返す
///
/// `1.005`のように2進数では丸め位置の直下にわずかに届かない値も、
/// 表示上の10進数に従って切り上げます。
fn round_decimal(value: f64, decimals: usize) -> String {
    let text = format!("{:.14e}", value);
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let exponent: i64 = exponent.parse().unwrap_or(0);
    let significant: Vec<u8> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();

    // 小数第decimals位までに含まれる桁数
    let keep = exponent + 1 + decimals as i64;
    let mut digits: Vec<u8> = match usize::try_from(keep) {
        Ok(keep) => {
            let mut kept: Vec<u8> = significant.iter().copied().take(keep).collect();
            kept.resize(keep, 0);
            kept
        }
        Err(_) => Vec::new(),
    };

    let round_up = usize::try_from(keep)
        .ok()
        .and_then(|keep| significant.get(keep))
        .is_some_and(|digit| *digit >= 5);
    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    while digits.len() <= decimals {
        digits.insert(0, 0);
    }

    let to_char = |digit: &u8| char::from(b'0' + digit);
    let split = digits.len() - decimals;
    let mut result: String = digits[..split].iter().map(to_char).collect();
    if decimals > 0 {
        result.push('.');
        result.extend(digits[split..].iter().map(to_char));
    }
    result
}

/// 10進数の指数（`1234.5`なら3）
fn decimal_exponent(value: f64) -> i32 {
    format!("{:e}", value)
        .split_once('e')
        .and_then(|(_, exponent)| exponent.parse().ok())
        .unwrap_or(0)
}

/// `value * 10^power`を計算
///
/// 非正規化数や`1e308`付近でも途中結果が0や無限大にならないよう、2段階で掛けます。
fn scale_by_power_of_ten(value: f64, power: i32) -> f64 {
    let half = power / 2;
    value * 10f64.powi(half) * 10f64.powi(power - half)
}

/// 千の位区切りを追加
fn add_thousand_separators(s: &str) -> String {
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();

    for (i, ch) in chars.iter().enumerate() {
        result.push(*ch);
        // 右から3桁ごとにカンマを追加（ただし最後の桁の後は追加しない）
        if (len - i - 1) % 3 == 0 && i < len - 1 {
            result.push(',');
        }
    }

    result
}
