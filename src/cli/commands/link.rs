use crate::links::{SiteCode, build_link};

pub fn cmd_link(site: &str, id: &str, title: Option<&str>) {
    if let Some(url) = build_link(id, site, title) {
        println!("{url}");
    } else {
        let known: Vec<&str> = SiteCode::ALL.iter().map(|s| s.code()).collect();
        println!("Unknown site code: {site}");
        println!("Known codes: {}", known.join(", "));
    }
}
