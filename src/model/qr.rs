//! QR code elements and payload helpers.
//!
//! Layout only needs the square's size. The module matrix is computed on
//! demand for renderers via the `qrcode` crate.

use serde::{Deserialize, Serialize};

use crate::error::QuireError;
use crate::style::{Color, TextAlign};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrection {
    /// ~7% recovery
    Low,
    /// ~15% recovery
    #[default]
    Medium,
    /// ~25% recovery
    Quartile,
    /// ~30% recovery
    High,
}

impl ErrorCorrection {
    fn ec_level(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WifiSecurity {
    Wep,
    #[default]
    Wpa,
    Wpa2,
    Open,
}

impl WifiSecurity {
    fn code(self) -> &'static str {
        match self {
            WifiSecurity::Wep => "WEP",
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wpa2 => "WPA2",
            WifiSecurity::Open => "nopass",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QrCodeElement {
    pub data: String,
    /// Edge length of the square in points.
    pub size: f64,
    pub align: TextAlign,
    pub foreground: Color,
    pub background: Color,
    pub error_correction: ErrorCorrection,
    /// Quiet zone in modules.
    pub margin: u32,
    pub spacing_after: f64,
}

impl Default for QrCodeElement {
    fn default() -> Self {
        Self {
            data: String::new(),
            size: 150.0,
            align: TextAlign::Center,
            foreground: Color::BLACK,
            background: Color::TRANSPARENT,
            error_correction: ErrorCorrection::Medium,
            margin: 1,
            spacing_after: 8.0,
        }
    }
}

/// Contact fields for a vCard payload. Only `first_name` is required.
#[derive(Debug, Clone, Default)]
pub struct VCard {
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

impl VCard {
    fn payload(&self) -> String {
        let mut out = String::from("BEGIN:VCARD\nVERSION:3.0\n");
        let last = self.last_name.as_deref().unwrap_or("");
        out.push_str(&format!("N:{};{};;;\n", last, self.first_name));
        match &self.last_name {
            Some(last) => out.push_str(&format!("FN:{} {}\n", self.first_name, last)),
            None => out.push_str(&format!("FN:{}\n", self.first_name)),
        }
        let fields = [
            ("ORG", &self.organization),
            ("TITLE", &self.title),
            ("TEL", &self.phone),
            ("EMAIL", &self.email),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                out.push_str(&format!("{}:{}\n", key, v));
            }
        }
        if let Some(addr) = &self.address {
            out.push_str(&format!("ADR:;;{};;;;\n", addr));
        }
        if let Some(url) = &self.website {
            out.push_str(&format!("URL:{}\n", url));
        }
        out.push_str("END:VCARD");
        out
    }
}

impl QrCodeElement {
    pub fn new(data: &str) -> Self {
        Self {
            data: data.to_string(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn url(url: &str) -> Self {
        Self::new(url)
    }

    pub fn text(text: &str) -> Self {
        Self::new(text)
    }

    pub fn email(address: &str, subject: Option<&str>, body: Option<&str>) -> Self {
        let mut params = Vec::new();
        if let Some(s) = subject {
            params.push(format!("subject={}", s));
        }
        if let Some(b) = body {
            params.push(format!("body={}", b));
        }
        let mut data = format!("mailto:{}", address);
        if !params.is_empty() {
            data.push('?');
            data.push_str(&params.join("&"));
        }
        Self::new(&data)
    }

    pub fn phone(number: &str) -> Self {
        Self::new(&format!("tel:{}", number))
    }

    pub fn sms(number: &str, message: Option<&str>) -> Self {
        match message {
            Some(m) => Self::new(&format!("sms:{}?body={}", number, m)),
            None => Self::new(&format!("sms:{}", number)),
        }
    }

    pub fn wifi(ssid: &str, password: Option<&str>, security: WifiSecurity, hidden: bool) -> Self {
        let mut data = format!("WIFI:T:{};S:{};", security.code(), ssid);
        if let Some(p) = password {
            data.push_str(&format!("P:{};", p));
        }
        if hidden {
            data.push_str("H:true;");
        }
        data.push(';');
        Self::new(&data)
    }

    pub fn vcard(card: &VCard) -> Self {
        Self::new(&card.payload())
    }

    pub fn location(latitude: f64, longitude: f64) -> Self {
        Self::new(&format!("geo:{},{}", latitude, longitude))
    }

    pub fn measure_height(&self) -> f64 {
        self.size + self.spacing_after
    }

    /// Encode the payload into a square module matrix, quiet zone included.
    pub fn modules(&self) -> Result<QrModules, QuireError> {
        let code = qrcode::QrCode::with_error_correction_level(
            self.data.as_bytes(),
            self.error_correction.ec_level(),
        )
        .map_err(|e| QuireError::Image(format!("QR encoding failed: {}", e)))?;

        let inner = code.width();
        let margin = self.margin as usize;
        let width = inner + margin * 2;
        let mut dark = vec![false; width * width];
        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color == qrcode::Color::Dark {
                let (x, y) = (i % inner + margin, i / inner + margin);
                dark[y * width + x] = true;
            }
        }
        Ok(QrModules { width, dark })
    }
}

/// Row-major dark/light modules of an encoded QR code.
#[derive(Debug, Clone, PartialEq)]
pub struct QrModules {
    pub width: usize,
    pub dark: Vec<bool>,
}

impl QrModules {
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_helpers() {
        assert_eq!(QrCodeElement::phone("+123").data, "tel:+123");
        assert_eq!(QrCodeElement::sms("555", Some("hi")).data, "sms:555?body=hi");
        assert_eq!(
            QrCodeElement::email("a@b.c", Some("Hello"), Some("Body")).data,
            "mailto:a@b.c?subject=Hello&body=Body"
        );
        assert_eq!(QrCodeElement::email("a@b.c", None, None).data, "mailto:a@b.c");
        assert_eq!(QrCodeElement::location(1.5, -2.25).data, "geo:1.5,-2.25");
    }

    #[test]
    fn wifi_payload() {
        let qr = QrCodeElement::wifi("Home", Some("secret"), WifiSecurity::Wpa2, true);
        assert_eq!(qr.data, "WIFI:T:WPA2;S:Home;P:secret;H:true;;");
        let open = QrCodeElement::wifi("Cafe", None, WifiSecurity::Open, false);
        assert_eq!(open.data, "WIFI:T:nopass;S:Cafe;;");
    }

    #[test]
    fn vcard_payload() {
        let card = VCard {
            first_name: "Ada".into(),
            last_name: Some("Lovelace".into()),
            email: Some("ada@example.com".into()),
            ..Default::default()
        };
        let data = QrCodeElement::vcard(&card).data;
        assert!(data.starts_with("BEGIN:VCARD\nVERSION:3.0\nN:Lovelace;Ada;;;\nFN:Ada Lovelace\n"));
        assert!(data.contains("EMAIL:ada@example.com\n"));
        assert!(data.ends_with("END:VCARD"));
    }

    #[test]
    fn height_is_size_plus_spacing() {
        assert!((QrCodeElement::url("https://x.y").with_size(100.0).measure_height() - 108.0).abs() < 1e-9);
    }

    #[test]
    fn module_matrix_has_quiet_zone() {
        let qr = QrCodeElement {
            margin: 2,
            ..QrCodeElement::text("quire")
        };
        let modules = qr.modules().unwrap();
        // Version 1 is 21 modules wide.
        assert_eq!(modules.width, 21 + 4);
        assert!(!modules.is_dark(0, 0));
        assert!(!modules.is_dark(1, 1));
        // Top-left finder pattern corner.
        assert!(modules.is_dark(2, 2));
    }
}
