pub const TEXT_PART_NAME: &str = "text.txt";
pub const SMIL_PART_NAME: &str = "smil.xml";
pub const SMIL_CONTENT_ID: &str = "<smil>";

pub fn image_part_name(extension: &str) -> String {
    format!("image.{}", extension)
}

/// Build the presentation document for a send request.
///
/// `image_name` and `has_text` decide which regions exist: image on top (70%)
/// with text below (30%) when both are present, otherwise the single region
/// takes the full height.
pub fn build_smil(image_name: Option<&str>, has_text: bool) -> String {
    let (image_height, text_height) = match (image_name.is_some(), has_text) {
        (true, true) => ("70%", "30%"),
        (true, false) => ("100%", "0%"),
        (false, _) => ("0%", "100%"),
    };

    let mut layout = String::new();
    let mut par = String::new();

    if let Some(name) = image_name {
        layout.push_str(&format!(
            "<region id=\"Image\" width=\"100%\" height=\"{}\" top=\"0%\" left=\"0%\" fit=\"meet\"/>",
            image_height
        ));
        par.push_str(&format!("<img src=\"{}\" region=\"Image\"/>", name));
    }

    if has_text {
        layout.push_str(&format!(
            "<region id=\"Text\" width=\"100%\" height=\"{}\" top=\"{}\" left=\"0%\" fit=\"scroll\"/>",
            text_height, image_height
        ));
        par.push_str(&format!(
            "<text src=\"{}\" region=\"Text\"/>",
            TEXT_PART_NAME
        ));
    }

    format!(
        "<smil><head><layout><root-layout width=\"100%\" height=\"100%\"/>{}</layout></head>\
         <body><par dur=\"5000ms\">{}</par></body></smil>",
        layout, par
    )
}
