use crate::dom::{Dom, DomError};
use crate::types::{Id, Token};

/// Builds `tokens` into `dom` as a detached fragment and returns the fragment's top-level nodes
/// in order.
///
/// End tags close the nearest open element with the same name; an end tag with no matching
/// open element is ignored. Doctypes are dropped since fragments never carry one.
pub(crate) fn build_fragment(dom: &mut Dom, tokens: Vec<Token>) -> Result<Vec<Id>, DomError> {
    let token_count = tokens.len();
    let mut roots: Vec<Id> = Vec::new();
    let mut open_elements: Vec<(Id, String)> = Vec::new();

    for token in tokens {
        let node = match token {
            Token::Doctype(_) => continue,
            Token::Comment(text) => dom.create_comment(text),
            Token::Text(text) => dom.create_text(text),
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let id = dom.create_element(&name, attributes);
                attach(dom, &mut roots, &open_elements, id)?;
                if !self_closing {
                    open_elements.push((id, name));
                }
                continue;
            }
            Token::EndTag(name) => {
                if let Some(pos) = open_elements.iter().rposition(|(_, open)| *open == name) {
                    open_elements.truncate(pos);
                }
                continue;
            }
        };
        attach(dom, &mut roots, &open_elements, node)?;
    }

    log::trace!(
        target: "html.parse",
        "built fragment: tokens={token_count} roots={} unclosed={}",
        roots.len(),
        open_elements.len()
    );
    Ok(roots)
}

fn attach(
    dom: &mut Dom,
    roots: &mut Vec<Id>,
    open_elements: &[(Id, String)],
    node: Id,
) -> Result<(), DomError> {
    match open_elements.last() {
        Some((parent, _)) => dom.append_child(*parent, node),
        None => {
            roots.push(node);
            Ok(())
        }
    }
}
