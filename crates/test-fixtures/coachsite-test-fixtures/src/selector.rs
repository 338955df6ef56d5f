//! Just enough CSS selector support for the page contract: comma lists of
//! compound selectors made of a tag, `#id`, `.class` and `[attr]`,
//! `[attr="v"]` or `[attr^="v"]`. No combinators.

use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    Present,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, AttrMatch)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(pub Vec<Compound>);

fn is_ident(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_ident(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn parse_compound(src: &str) -> Result<Compound> {
    let chars: Vec<char> = src.trim().chars().collect();
    if chars.is_empty() {
        bail!("empty selector");
    }
    let mut out = Compound::default();
    let mut pos = 0;
    if is_ident(chars[0]) {
        out.tag = Some(take_ident(&chars, &mut pos).to_ascii_lowercase());
    }
    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                out.id = Some(take_ident(&chars, &mut pos));
            }
            '.' => {
                pos += 1;
                out.classes.push(take_ident(&chars, &mut pos));
            }
            '[' => {
                pos += 1;
                let name = take_ident(&chars, &mut pos);
                let matcher = match chars.get(pos) {
                    Some(']') => AttrMatch::Present,
                    Some('=') | Some('^') => {
                        let prefix = chars[pos] == '^';
                        pos += if prefix { 2 } else { 1 };
                        let quote = chars.get(pos).copied();
                        let value: String = if matches!(quote, Some('"') | Some('\'')) {
                            pos += 1;
                            let start = pos;
                            while pos < chars.len() && Some(chars[pos]) != quote {
                                pos += 1;
                            }
                            let v = chars[start..pos].iter().collect();
                            pos += 1;
                            v
                        } else {
                            take_ident(&chars, &mut pos)
                        };
                        if prefix {
                            AttrMatch::Prefix(value)
                        } else {
                            AttrMatch::Equals(value)
                        }
                    }
                    other => bail!("unsupported attribute selector near {other:?} in '{src}'"),
                };
                if chars.get(pos) != Some(&']') {
                    bail!("unterminated attribute selector in '{src}'");
                }
                pos += 1;
                out.attrs.push((name, matcher));
            }
            c => bail!("unsupported selector character '{c}' in '{src}'"),
        }
    }
    Ok(out)
}

impl SelectorList {
    pub fn parse(src: &str) -> Result<Self> {
        src.split(',').map(parse_compound).collect::<Result<Vec<_>>>().map(SelectorList)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_page_contract_selectors() {
        let list = SelectorList::parse("a[href^=\"#\"]").unwrap();
        assert_eq!(list.0[0].tag.as_deref(), Some("a"));
        assert_eq!(list.0[0].attrs[0], ("href".into(), AttrMatch::Prefix("#".into())));

        let list = SelectorList::parse(".hero-text, .hero-image").unwrap();
        assert_eq!(list.0.len(), 2);
        assert_eq!(list.0[1].classes, vec!["hero-image".to_string()]);

        let list = SelectorList::parse("section[id]").unwrap();
        assert_eq!(list.0[0].attrs[0].1, AttrMatch::Present);

        let list = SelectorList::parse("img[loading=\"lazy\"]").unwrap();
        assert_eq!(list.0[0].attrs[0].1, AttrMatch::Equals("lazy".into()));
    }

    #[test]
    fn rejects_combinators() {
        assert!(SelectorList::parse(".a > .b").is_err());
    }
}
