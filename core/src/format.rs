//! Minimal printf-style rendering for filter templates and value formats.
//!
//! Every conversion in a template consumes the same single argument, so
//! `"ILIKE '%%%s%%'"` and `"%d%% more awesome!"` both render from one value.
//! Supported: `%%`, flags `- 0 + space`, width, precision and the conversions
//! `s d i f x X o`. Anything else is copied through verbatim.

use crate::value::{Value, parse_float, parse_integer};

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    width: usize,
    precision: Option<usize>,
}

/// Render `template` with `arg` substituted into every conversion.
pub fn sprintf(template: &str, arg: &Value) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&(_, flag)) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = take_number(&mut chars).unwrap_or(0);
        if chars.next_if(|&(_, c)| c == '.').is_some() {
            spec.precision = Some(take_number(&mut chars).unwrap_or(0));
        }

        let Some((end, conv)) = chars.next() else {
            out.push_str(&template[start..]);
            break;
        };
        match conv {
            '%' => out.push('%'),
            's' => {
                let text = arg.to_string();
                let text = match spec.precision {
                    Some(p) => text.chars().take(p).collect(),
                    None => text,
                };
                pad(&mut out, "", &text, spec, false);
            }
            'd' | 'i' => {
                let n = integer_arg(arg);
                pad(&mut out, sign(n < 0, spec), &n.unsigned_abs().to_string(), spec, true);
            }
            'f' => {
                let f = float_arg(arg);
                let body = format!("{:.*}", spec.precision.unwrap_or(6), f.abs());
                pad(&mut out, sign(f.is_sign_negative() && f != 0.0, spec), &body, spec, true);
            }
            'x' | 'X' | 'o' => {
                let n = integer_arg(arg);
                let abs = n.unsigned_abs();
                let body = match conv {
                    'x' => format!("{abs:x}"),
                    'X' => format!("{abs:X}"),
                    _ => format!("{abs:o}"),
                };
                pad(&mut out, sign(n < 0, spec), &body, spec, true);
            }
            _ => out.push_str(&template[start..end + conv.len_utf8()]),
        }
    }
    out
}

fn take_number(chars: &mut core::iter::Peekable<core::str::CharIndices<'_>>) -> Option<usize> {
    let mut n: Option<usize> = None;
    while let Some((_, d)) = chars.next_if(|(_, c)| c.is_ascii_digit()) {
        let digit = d.to_digit(10).unwrap_or(0) as usize;
        n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(digit));
    }
    n
}

const fn sign(negative: bool, spec: Spec) -> &'static str {
    if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

fn pad(out: &mut String, sign: &str, body: &str, spec: Spec, numeric: bool) {
    let len = sign.len() + body.chars().count();
    let fill = spec.width.saturating_sub(len);
    if spec.left {
        out.push_str(sign);
        out.push_str(body);
        out.extend(core::iter::repeat_n(' ', fill));
    } else if spec.zero && numeric {
        out.push_str(sign);
        out.extend(core::iter::repeat_n('0', fill));
        out.push_str(body);
    } else {
        out.extend(core::iter::repeat_n(' ', fill));
        out.push_str(sign);
        out.push_str(body);
    }
}

fn integer_arg(arg: &Value) -> i64 {
    match arg {
        Value::Integer(i) => *i,
        Value::Float(f) => f.floor() as i64,
        Value::Boolean(b) => i64::from(*b),
        Value::Text(s) => parse_integer(s),
        Value::DateTime(dt) => dt.and_utc().timestamp(),
        Value::Null => 0,
    }
}

fn float_arg(arg: &Value) -> f64 {
    match arg {
        Value::Float(f) => *f,
        Value::Integer(i) => *i as f64,
        Value::Boolean(b) => f64::from(u8::from(*b)),
        Value::Text(s) => parse_float(s),
        Value::DateTime(dt) => dt.and_utc().timestamp() as f64,
        Value::Null => 0.0,
    }
}
