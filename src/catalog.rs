use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::api::ClientError;
use crate::protocol::{CatalogEntry, Cost};

pub const ITEM_CLASS: &str = "entity-item";
pub const SELECTED_CLASS: &str = "selected";

pub fn cost_line(cost: &Cost) -> String {
    format!("money: {}, power: {}, sun: {}", cost.money(), cost.power(), cost.sun())
}

/// Text of the three lines shown for an item: name, cost and description.
/// Assigned as text content, so backend strings are never parsed as markup.
pub fn item_fields(name: &str, entry: &CatalogEntry) -> [String; 3] {
    [name.to_string(), cost_line(&entry.cost), entry.description.clone()]
}

// --- DOM ---

fn text_node(document: &Document, tag: &str, class: Option<&str>, text: &str) -> Result<Element, ClientError> {
    let el = document.create_element(tag)?;
    if let Some(class) = class {
        el.class_list().add_1(class)?;
    }
    el.set_text_content(Some(text));
    Ok(el)
}

pub fn create_item(document: &Document, name: &str, entry: &CatalogEntry) -> Result<Element, ClientError> {
    let item = document.create_element("div")?;
    item.class_list().add_1(ITEM_CLASS)?;
    item.set_attribute("data-entity-type", name)?;

    let icon = document.create_element("div")?;
    icon.class_list().add_1("entity-icon")?;
    item.append_child(&icon)?;

    let [title, cost, description] = item_fields(name, entry);
    let details = document.create_element("div")?;
    details.class_list().add_1("entity-details")?;
    let heading = document.create_element("p")?;
    let strong = text_node(document, "strong", None, &title)?;
    heading.append_child(&strong)?;
    details.append_child(&heading)?;
    let cost_el = text_node(document, "p", Some("cost"), &cost)?;
    details.append_child(&cost_el)?;
    let description_el = text_node(document, "p", None, &description)?;
    details.append_child(&description_el)?;
    item.append_child(&details)?;
    Ok(item)
}

pub fn clear_selection_style(document: &Document) -> Result<(), ClientError> {
    let items = document.query_selector_all(&format!(".{}", ITEM_CLASS))?;
    for i in 0..items.length() {
        if let Some(el) = items.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            el.class_list().remove_1(SELECTED_CLASS)?;
        }
    }
    Ok(())
}

/// Styles exactly the item for `selected`, or none.
pub fn sync_selection_style(document: &Document, selected: Option<&str>) -> Result<(), ClientError> {
    clear_selection_style(document)?;
    let Some(name) = selected else { return Ok(()) };
    let items = document.query_selector_all(&format!(".{}", ITEM_CLASS))?;
    for i in 0..items.length() {
        if let Some(el) = items.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            if el.get_attribute("data-entity-type").as_deref() == Some(name) {
                el.class_list().add_1(SELECTED_CLASS)?;
            }
        }
    }
    Ok(())
}
