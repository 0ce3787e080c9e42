// Navigation bar behaviour: background/blur that follows the scroll position,
// active link highlighting, mobile menu toggle and offset anchor scrolling.

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    console, Document, Element, Event, HtmlElement, Node, ScrollBehavior, ScrollToOptions, Window,
};

pub const SOLID_AFTER: f64 = 50.0;
pub const SECTION_PROBE_OFFSET: f64 = 100.0;
pub const HEADER_OFFSET: f64 = 80.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavbarStyle {
    pub background: &'static str,
    pub backdrop_filter: &'static str,
}

pub fn navbar_style(scroll_y: f64) -> NavbarStyle {
    if scroll_y > SOLID_AFTER {
        NavbarStyle {
            background: "rgba(252, 252, 249, 0.98)",
            backdrop_filter: "blur(15px)",
        }
    } else {
        NavbarStyle {
            background: "rgba(252, 252, 249, 0.95)",
            backdrop_filter: "blur(10px)",
        }
    }
}

// Page-space vertical extent of a section
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub bottom: f64,
}

// Index of the section under the probe line; on overlap the later section wins
pub fn active_section(sections: &[SectionBounds], scroll_y: f64) -> Option<usize> {
    let probe = scroll_y + SECTION_PROBE_OFFSET;
    sections
        .iter()
        .rposition(|s| probe >= s.top && probe <= s.bottom)
}

// Page offset to scroll to so the target clears the fixed header
pub fn scroll_target(element_top: f64, page_offset: f64) -> f64 {
    element_top + page_offset - HEADER_OFFSET
}

fn html_elements(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

#[wasm_bindgen]
pub struct Navigation {
    window: Window,
    document: Document,
    navbar: Option<HtmlElement>,
    menu: Option<Element>,
    hamburger: Option<Element>,
    links: Vec<HtmlElement>,
}

#[wasm_bindgen]
impl Navigation {
    pub fn new() -> Result<Navigation, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let navbar = document
            .query_selector(".navbar")?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let menu = document.query_selector(".nav-menu")?;
        let hamburger = document.query_selector(".hamburger")?;
        let links = html_elements(&document, ".nav-link")?;
        Ok(Navigation {
            window,
            document,
            navbar,
            menu,
            hamburger,
            links,
        })
    }

    pub fn on_scroll(&self) -> Result<(), JsValue> {
        let scroll_y = self.window.page_y_offset()?;
        if let Some(navbar) = &self.navbar {
            let style = navbar_style(scroll_y);
            navbar.style().set_property("background", style.background)?;
            navbar
                .style()
                .set_property("backdrop-filter", style.backdrop_filter)?;
        }
        self.highlight_active(scroll_y)
    }

    // Smooth-scrolls to an in-page anchor; returns false when href is not one
    pub fn scroll_to(&self, href: &str) -> Result<bool, JsValue> {
        if !href.starts_with('#') {
            return Ok(false);
        }
        let target = match self.document.query_selector(href)? {
            Some(target) => target,
            None => return Ok(false),
        };
        let top = scroll_target(
            target.get_bounding_client_rect().top(),
            self.window.page_y_offset()?,
        );
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
        Ok(true)
    }

    pub fn toggle_menu(&self) -> Result<(), JsValue> {
        if let (Some(menu), Some(hamburger)) = (&self.menu, &self.hamburger) {
            menu.class_list().toggle("active")?;
            let open = hamburger.class_list().toggle("active")?;
            self.style_bars(hamburger, open)?;
        }
        Ok(())
    }

    pub fn close_menu(&self) -> Result<(), JsValue> {
        if let (Some(menu), Some(hamburger)) = (&self.menu, &self.hamburger) {
            menu.class_list().remove_1("active")?;
            hamburger.class_list().remove_1("active")?;
            self.style_bars(hamburger, false)?;
        }
        Ok(())
    }
}

impl Navigation {
    fn highlight_active(&self, scroll_y: f64) -> Result<(), JsValue> {
        let sections = html_elements(&self.document, "section[id]")?;
        let bounds: Vec<SectionBounds> = sections
            .iter()
            .map(|s| {
                let top = s.get_bounding_client_rect().top() + scroll_y;
                SectionBounds {
                    top,
                    bottom: top + s.offset_height() as f64,
                }
            })
            .collect();

        let active = match active_section(&bounds, scroll_y) {
            Some(i) => &sections[i],
            None => return Ok(()),
        };
        for link in &self.links {
            link.class_list().remove_1("active")?;
        }
        let selector = format!(".nav-link[href=\"#{}\"]", active.id());
        if let Some(link) = self.document.query_selector(&selector)? {
            link.class_list().add_1("active")?;
        }
        Ok(())
    }

    // Three bars morph into a cross while the menu is open
    fn style_bars(&self, hamburger: &Element, open: bool) -> Result<(), JsValue> {
        let bars = hamburger.query_selector_all(".bar")?;
        for i in 0..bars.length() {
            let bar = match bars.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                Some(bar) => bar,
                None => continue,
            };
            let style = bar.style();
            match (open, i) {
                (true, 0) => style.set_property("transform", "rotate(-45deg) translate(-5px, 6px)")?,
                (true, 1) => style.set_property("opacity", "0")?,
                (true, 2) => style.set_property("transform", "rotate(45deg) translate(-5px, -6px)")?,
                (true, _) => {}
                (false, _) => {
                    style.set_property("transform", "none")?;
                    style.set_property("opacity", "1")?;
                }
            }
        }
        Ok(())
    }
}

fn report(result: Result<(), JsValue>) {
    if let Err(e) = result {
        console::error_2(&"navigation handler failed:".into(), &e);
    }
}

// Wires scroll, hamburger, link and outside clicks; listeners live as long as the page
#[wasm_bindgen]
pub fn install_navigation() -> Result<(), JsValue> {
    let nav = Rc::new(Navigation::new()?);

    let on_scroll = {
        let nav = nav.clone();
        Closure::wrap(Box::new(move || report(nav.on_scroll())) as Box<dyn FnMut()>)
    };
    nav.window
        .add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();

    if let Some(hamburger) = &nav.hamburger {
        let on_toggle = {
            let nav = nav.clone();
            Closure::wrap(Box::new(move || report(nav.toggle_menu())) as Box<dyn FnMut()>)
        };
        hamburger.add_event_listener_with_callback("click", on_toggle.as_ref().unchecked_ref())?;
        on_toggle.forget();
    }

    for link in &nav.links {
        let on_click = {
            let nav = nav.clone();
            let href = link.get_attribute("href").unwrap_or_default();
            Closure::wrap(Box::new(move |event: Event| {
                event.prevent_default();
                report(nav.scroll_to(&href).map(|_| ()));
                report(nav.close_menu());
            }) as Box<dyn FnMut(Event)>)
        };
        link.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }

    let on_outside = {
        let nav = nav.clone();
        Closure::wrap(Box::new(move |event: Event| {
            let inside = match (&nav.navbar, event.target()) {
                (Some(navbar), Some(target)) => navbar.contains(target.dyn_ref::<Node>()),
                (Some(_), None) => false,
                (None, _) => return,
            };
            if !inside {
                report(nav.close_menu());
            }
        }) as Box<dyn FnMut(Event)>)
    };
    nav.document
        .add_event_listener_with_callback("click", on_outside.as_ref().unchecked_ref())?;
    on_outside.forget();

    console::log_1(&format!("navigation ready, {} links", nav.links.len()).into());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionBounds> {
        vec![
            SectionBounds { top: 0.0, bottom: 600.0 },
            SectionBounds { top: 600.0, bottom: 1400.0 },
            SectionBounds { top: 1400.0, bottom: 2000.0 },
        ]
    }

    #[test]
    fn navbar_turns_solid_past_threshold() {
        assert_eq!(navbar_style(50.0).backdrop_filter, "blur(10px)");
        assert_eq!(navbar_style(50.5).backdrop_filter, "blur(15px)");
        assert_eq!(navbar_style(0.0).background, "rgba(252, 252, 249, 0.95)");
    }

    #[test]
    fn active_line_sits_below_scroll_position() {
        assert_eq!(active_section(&sections(), 0.0), Some(0));
        assert_eq!(active_section(&sections(), 800.0), Some(1));
        assert_eq!(active_section(&sections(), 1850.0), Some(2));
    }

    #[test]
    fn shared_boundary_goes_to_later_section() {
        assert_eq!(active_section(&sections(), 500.0), Some(1));
    }

    #[test]
    fn nothing_active_past_last_section() {
        assert_eq!(active_section(&sections(), 5000.0), None);
        assert_eq!(active_section(&[], 0.0), None);
    }

    #[test]
    fn anchor_target_clears_header() {
        assert_eq!(scroll_target(300.0, 1000.0), 1220.0);
        assert_eq!(scroll_target(-200.0, 1000.0), 720.0);
    }
}
