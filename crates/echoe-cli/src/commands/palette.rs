use echoe_core::models::{COLOR_PALETTE, DEFAULT_COLOR_TAG};

pub fn run_palette() {
    for line in palette_lines() {
        println!("{line}");
    }
}

pub fn palette_lines() -> Vec<String> {
    COLOR_PALETTE
        .iter()
        .map(|color| {
            let marker = if color.value == DEFAULT_COLOR_TAG {
                " (default)"
            } else {
                ""
            };
            format!("{:<8}{}{marker}", color.name, color.value)
        })
        .collect()
}
