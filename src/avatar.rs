use crate::errors::DiaryError;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Grey cat face shown until an image is picked. `#` is escaped as `%23`
/// so the SVG survives as a data URI.
pub const DEFAULT_AVATAR: &str = concat!(
    "data:image/svg+xml;utf8,",
    "<svg width='128' height='128' viewBox='0 0 64 64' xmlns='http://www.w3.org/2000/svg'>",
    "<circle cx='32' cy='32' r='31' fill='%23f1ede6'/>",
    "<path d='M14 26 L18 8 L28 20 Z M50 26 L46 8 L36 20 Z' fill='%23b9b3aa'/>",
    "<ellipse cx='32' cy='36' rx='20' ry='17' fill='%23b9b3aa'/>",
    "<circle cx='25' cy='33' r='2.6' fill='%23403c37'/>",
    "<circle cx='39' cy='33' r='2.6' fill='%23403c37'/>",
    "<path d='M30 40 L34 40 L32 42.5 Z' fill='%23e58f8f'/>",
    "<path d='M22 41 L8 39 M22 44 L8 46 M42 41 L56 39 M42 44 L56 46' ",
    "stroke='%23403c37' stroke-width='1.2' stroke-linecap='round'/>",
    "</svg>"
);

/// Turns an uploaded image into an inline `data:` URI suitable for storing
/// as the avatar.
pub fn encode_data_uri(content_type: &str, bytes: &[u8]) -> Result<String, DiaryError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let subtype = mime.strip_prefix("image/").unwrap_or_default();
    if subtype.is_empty() {
        return Err(DiaryError::UnsupportedImage(content_type.to_string()));
    }
    if bytes.is_empty() {
        return Err(DiaryError::EmptyImage);
    }

    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}
