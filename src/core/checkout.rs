use crate::domain::model::SiteSettings;
use crate::utils::error::{PbnError, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutChannel {
    WhatsApp,
    Telegram,
}

/// What the visitor wants to talk to the admin about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderMessage {
    Package {
        name: String,
        backlink_count: i64,
        target_url: Option<String>,
        anchor_text: Option<String>,
    },
    CustomPbn {
        code: Option<String>,
    },
    Domain {
        domain_name: String,
    },
    Inquiry,
}

impl OrderMessage {
    /// Message body for the given channel, before URL encoding.
    pub fn render(&self, site_name: &str, channel: CheckoutChannel) -> String {
        match (self, channel) {
            (
                OrderMessage::Package {
                    name,
                    backlink_count,
                    ..
                },
                CheckoutChannel::Telegram,
            ) => format!("Saya mau pesan {} ({} backlink)", name, backlink_count),
            (
                OrderMessage::Package {
                    name,
                    backlink_count,
                    target_url,
                    anchor_text,
                },
                CheckoutChannel::WhatsApp,
            ) => {
                let target_url = target_url.as_deref().filter(|s| !s.trim().is_empty());
                let anchor_text = anchor_text.as_deref().filter(|s| !s.trim().is_empty());

                let mut message = greeting(site_name);
                message.push_str(&format!(
                    "Saya mau pesan *{}* ({} backlink).\n\n",
                    name, backlink_count
                ));
                if let Some(url) = target_url {
                    message.push_str(&format!("📌 *URL Target:*\n{}\n\n", url));
                }
                if let Some(anchor) = anchor_text {
                    message.push_str(&format!("🔗 *Anchor Text:*\n{}\n\n", anchor));
                }
                if target_url.is_none() && anchor_text.is_none() {
                    message.push_str("Mohon info detail lebih lanjut tentang paket ini.\n\n");
                }
                message.push_str("Terima kasih!");
                message
            }
            (OrderMessage::CustomPbn { code }, _) => {
                let mut message = greeting(site_name);
                message.push_str("Saya tertarik untuk order backlink dengan custom PBN.\n\n");
                if let Some(code) = code.as_deref().filter(|s| !s.trim().is_empty()) {
                    message.push_str(&format!("PBN yang saya pilih: *{}*\n\n", code));
                }
                message.push_str("Mohon info lebih lanjut tentang harga dan prosesnya.\n\n");
                message.push_str("Terima kasih!");
                message
            }
            (OrderMessage::Domain { domain_name }, _) => format!(
                "Halo admin {}! Saya tertarik dengan domain: {}. Mohon info lebih lanjut.",
                site_name, domain_name
            ),
            (OrderMessage::Inquiry, _) => {
                let mut message = greeting(site_name);
                message.push_str("Saya ingin bertanya tentang layanan backlink PBN Anda.\n\n");
                message.push_str("Mohon info lebih lanjut.\n\n");
                message.push_str("Terima kasih!");
                message
            }
        }
    }
}

fn greeting(site_name: &str) -> String {
    format!("Halo admin {}! 👋\n\n", site_name)
}

/// `https://wa.me/{digits}?text={message}`; every non-digit is stripped from the phone number.
pub fn whatsapp_url(phone_number: &str, message: &str) -> Result<String> {
    let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(PbnError::InvalidConfigValueError {
            field: "whatsapp_number".to_string(),
            value: phone_number.to_string(),
            reason: "Phone number contains no digits".to_string(),
        });
    }
    Ok(format!("https://wa.me/{}?text={}", digits, encode_component(message)))
}

pub fn telegram_url(username: &str, message: &str) -> String {
    let username = username.trim().trim_start_matches('@');
    if message.is_empty() {
        format!("https://t.me/{}", username)
    } else {
        format!("https://t.me/{}?text={}", username, encode_component(message))
    }
}

/// Deep link for `order` on `channel`, using the contact details in `settings`.
pub fn checkout_link(
    settings: &SiteSettings,
    channel: CheckoutChannel,
    order: &OrderMessage,
) -> Result<String> {
    let message = order.render(&settings.site_name, channel);
    match channel {
        CheckoutChannel::WhatsApp => whatsapp_url(&settings.whatsapp_number, &message),
        CheckoutChannel::Telegram => {
            let username = settings
                .telegram_username
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| PbnError::MissingConfigError {
                    field: "telegram_username".to_string(),
                })?;
            Ok(telegram_url(username, &message))
        }
    }
}
