//! Keyword responder behind the chat window.
//!
//! Questions are lower-cased and matched against an ordered rule table; the
//! first rule with a keyword contained in the question wins. Catalog intents
//! render the matching products as an HTML table.

use askama::Template;
use rand::seq::IndexedRandom;

use crate::{
    dto::{
        chat::{ChatReply, ReplyKind},
        products::ProductFilter,
    },
    error::AppResult,
    models::{Product, format_soles},
    services::{product_service, support_service},
    state::AppState,
};

/// Rows shown for the "full catalog" answer.
const FULL_CATALOG_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartCategory {
    Brakes,
    Engine,
    Suspension,
    Electrical,
    Lubricants,
}

impl PartCategory {
    /// Category name as stored in the catalog.
    pub fn catalog_name(self) -> &'static str {
        match self {
            PartCategory::Brakes => "Frenos",
            PartCategory::Engine => "Motor",
            PartCategory::Suspension => "Suspension",
            PartCategory::Electrical => "Electrico",
            PartCategory::Lubricants => "Lubricantes",
        }
    }

    fn heading(self) -> (&'static str, &'static str, &'static str, &'static str) {
        match self {
            PartCategory::Brakes => (
                "Sistema de Frenos",
                "Productos disponibles en sistema de frenos:",
                "🛑",
                "#EF4444",
            ),
            PartCategory::Engine => (
                "Sistema del Motor",
                "Productos disponibles en sistema del motor:",
                "🔧",
                "#F59E0B",
            ),
            PartCategory::Suspension => (
                "Suspensión y Dirección",
                "Productos disponibles en suspensión:",
                "🔄",
                "#8B5CF6",
            ),
            PartCategory::Electrical => (
                "Sistema Eléctrico",
                "Productos disponibles en sistema eléctrico:",
                "⚡",
                "#F59E0B",
            ),
            PartCategory::Lubricants => (
                "Lubricantes y Fluidos",
                "Productos disponibles en lubricantes:",
                "🛢️",
                "#06B6D4",
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    PaymentMethods,
    FullCatalog,
    Category(PartCategory),
    Brand(&'static str),
    OpeningHours,
    Location,
    Brands,
    Quote,
    Warranty,
    Contact,
    Services,
    Shipping,
    Farewell,
    Unknown,
}

enum Target {
    Fixed(Intent),
    /// Resolves to the brand keyword that matched.
    Brand,
}

struct Rule {
    target: Target,
    keywords: &'static [&'static str],
}

const RULES: &[Rule] = &[
    Rule {
        target: Target::Fixed(Intent::Greeting),
        keywords: &["hola", "buenos días", "buenas tardes", "buenas", "hi", "hello", "buen dia"],
    },
    Rule {
        target: Target::Fixed(Intent::PaymentMethods),
        keywords: &[
            "métodos de pago",
            "metodos de pago",
            "cuales son sus métodos de pago",
            "tipo de pago",
            "pagos",
            "formas de pago",
            "medios de pago",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::FullCatalog),
        keywords: &[
            "catalogo",
            "catálogo",
            "productos",
            "piezas",
            "repuestos",
            "stock",
            "disponible",
            "listado",
            "inventario",
            "tabla",
            "precios",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Category(PartCategory::Brakes)),
        keywords: &["frenos", "pastillas", "discos"],
    },
    Rule {
        target: Target::Fixed(Intent::Category(PartCategory::Engine)),
        keywords: &["motor", "correa", "bujías", "filtro"],
    },
    Rule {
        target: Target::Fixed(Intent::Category(PartCategory::Suspension)),
        keywords: &["suspensión", "suspension", "amortiguador", "rotula"],
    },
    Rule {
        target: Target::Fixed(Intent::Category(PartCategory::Electrical)),
        keywords: &["eléctrico", "electrico", "batería", "bateria", "alternador"],
    },
    Rule {
        target: Target::Fixed(Intent::Category(PartCategory::Lubricants)),
        keywords: &["aceite", "lubricante", "fluido"],
    },
    Rule {
        target: Target::Brand,
        keywords: &["bosch", "brembo", "acdelco", "denso", "ngk", "kyb"],
    },
    Rule {
        target: Target::Fixed(Intent::OpeningHours),
        keywords: &[
            "horario", "hora", "atención", "abren", "cierra", "atienden", "cuándo", "cuando",
            "disponible",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Location),
        keywords: &[
            "ubicación",
            "dirección",
            "mapa",
            "donde",
            "lugar",
            "ubicacion",
            "local",
            "ubican",
            "encuentran",
            "sucursal",
            "direccion",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Brands),
        keywords: &[
            "marca", "modelo", "toyota", "nissan", "honda", "hyundai", "chevrolet", "ford", "bmw",
            "mercedes", "proveedor",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Quote),
        keywords: &[
            "costo",
            "precio",
            "cuánto",
            "vale",
            "costos",
            "precios",
            "cotización",
            "cotizacion",
            "presupuesto",
            "valor",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Warranty),
        keywords: &[
            "garantía",
            "garantia",
            "calidad",
            "confianza",
            "seguro",
            "devolución",
            "devolucion",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Contact),
        keywords: &[
            "contacto",
            "teléfono",
            "telefono",
            "whatsapp",
            "email",
            "correo",
            "llamar",
            "comunico",
            "comunicar",
            "comunicación",
            "comunicacion",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Services),
        keywords: &[
            "servicio",
            "servicios",
            "instalación",
            "instalacion",
            "montaje",
            "asesoría",
            "asesoria",
            "taller",
            "mantenimiento",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Shipping),
        keywords: &[
            "envío", "envio", "delivery", "entrega", "shipping", "domicilio", "enviar", "recoger",
        ],
    },
    Rule {
        target: Target::Fixed(Intent::Farewell),
        keywords: &["adiós", "chao", "gracias", "bye", "salir", "nos vemos", "hasta luego"],
    },
];

const GREETINGS: &[&str] = &[
    "¡Hola! Soy tu asistente virtual de Autopartes - Verese Sac. ¿En qué puedo ayudarte hoy?",
    "¡Buen día! Estoy aquí para ayudarte a encontrar las autopartes que necesitas. ¿Qué estás buscando?",
    "¡Hola! Bienvenido a Autopartes - Verese Sac. Cuéntame, ¿qué autoparte necesitas para tu vehículo?",
    "¡Hola! 👋 ¿Buscas autopartes? Estoy aquí para asesorarte y ayudarte a encontrar lo que necesitas.",
];

const FAREWELLS: &[&str] = &[
    "¡Gracias por contactarnos! Espero haberte ayudado. No dudes en volver si necesitas más autopartes.",
    "¡Hasta pronto! Recuerda que tenemos las mejores autopartes con garantía y calidad certificada.",
    "¡Que tengas un excelente día! Si necesitas algo más, aquí estaré para ayudarte.",
    "¡Fue un gusto atenderte! No olvides que tenemos promociones especiales cada semana.",
];

/// First matching intent for a free-text question.
pub fn classify(question: &str) -> Intent {
    let question = question.trim().to_lowercase();
    for rule in RULES {
        if let Some(hit) = rule.keywords.iter().find(|k| question.contains(*k)) {
            return match rule.target {
                Target::Fixed(intent) => intent,
                Target::Brand => Intent::Brand(*hit),
            };
        }
    }
    Intent::Unknown
}

/// Answers a chat question. Unrecognised questions are queued for support.
pub async fn answer(state: &AppState, question: &str) -> AppResult<ChatReply> {
    let intent = classify(question);
    tracing::debug!(?intent, "chat question classified");

    let reply = match intent {
        Intent::FullCatalog => {
            let mut products = product_service::list_products(state, &ProductFilter::default()).await?;
            products.truncate(FULL_CATALOG_LIMIT);
            catalog_reply(
                "Catálogo Completo",
                "Consulta nuestro catálogo completo de autopartes:",
                "📊",
                "#10B981",
                &products,
            )?
        }
        Intent::Category(category) => {
            let products = product_service::list_products(
                state,
                &ProductFilter::category(category.catalog_name()),
            )
            .await?;
            let (title, body, icon, color) = category.heading();
            catalog_reply(title, body, icon, color, &products)?
        }
        Intent::Brand(brand) => {
            let products =
                product_service::list_products(state, &ProductFilter::brand(brand)).await?;
            let upper = brand.to_uppercase();
            catalog_reply(
                &format!("Productos {upper}"),
                &format!("Productos disponibles de la marca {upper}:"),
                "🏷️",
                "#8B5CF6",
                &products,
            )?
        }
        Intent::Unknown => {
            if let Err(err) =
                support_service::submit_question(state, question, Some(support_service::DEFAULT_CATEGORY)).await
            {
                tracing::warn!(error = %err, "failed to queue unanswered question");
            }
            canned_reply(intent)
        }
        other => canned_reply(other),
    };

    Ok(reply)
}

/// Replies that need no database access.
pub fn canned_reply(intent: Intent) -> ChatReply {
    match intent {
        Intent::Greeting => ChatReply::card("¡Hola!", pick(GREETINGS), "👋", "#3B82F6"),
        Intent::Farewell => ChatReply::card("¡Hasta pronto!", pick(FAREWELLS), "👋", "#3B82F6"),
        Intent::PaymentMethods => ChatReply::card(
            "Métodos de Pago",
            "**Excelente pregunta, contamos con todo tipo de pago para BCP, BVVA e INTERBANK:**\n\n\
💳 **Yape:** +51 978 462 485\n\
📱 **Plin:** +51 978 462 485\n\
🏦 **Transferencia:** 1558 - 1749667 - 26560\n\n\
**También aceptamos:**\n\
• Efectivo en soles\n\
• Tarjetas de crédito/débito (Visa, MasterCard)\n\
• Depósitos bancarios\n\
• Pago contra entrega",
            "💳",
            "#10B981",
        ),
        Intent::OpeningHours => ChatReply::card(
            "Horario de Atención",
            "**Lunes a Viernes:** 8:00 a.m. - 18:00 p.m.\n\
**Sábados:** 9:00 a.m. - 14:00 p.m.\n\
**Domingos:** Cerrado",
            "🕒",
            "#F59E0B",
        ),
        Intent::Location => ChatReply {
            map: true,
            ..ChatReply::card(
                "Ubicación y Sucursales",
                "**📍 Sucursal Principal:**\n\
Av. Las Autopartes 123\n\
San Juan de Lurigancho, Lima, Perú\n\n\
**📍 Sucursal Centro:**\n\
Jr. Repuestos 456, Cercado de Lima\n\n\
**Horario de atención en ambas sucursales:**\n\
Lunes a Viernes: 8:00 am - 6:00 pm\n\
Sábados: 9:00 am - 2:00 pm",
                "📍",
                "#EF4444",
            )
        },
        Intent::Brands => ChatReply::card(
            "Marcas y Proveedores",
            "**🏆 Marcas Premium:**\n\
• Toyota • Nissan • Honda\n\
• Hyundai • Kia • Chevrolet\n\
• Ford • Volkswagen • BMW\n\n\
**🇪🇺 Marcas Europeas:**\n\
• Mercedes-Benz • Audi • Volvo\n\
• Renault • Peugeot • Fiat\n\n\
**🇺🇸 Marcas Americanas:**\n\
• Dodge • Chrysler • Jeep • GMC\n\n\
**🔩 Proveedores Oficiales:**\n\
• Bosch • Denso • ACDelco\n\
• Monroe • KYB • Gates\n\n\
**Trabajamos con las mejores marcas del mercado**",
            "🏷️",
            "#8B5CF6",
        ),
        Intent::Quote => ChatReply::card(
            "Cotizaciones y Precios",
            "**📋 Para una cotización precisa necesitamos:**\n\n\
1. **Marca y modelo** del vehículo\n\
2. **Año** de fabricación\n\
3. **Autoparte específica** requerida\n\
4. **Número de VIN** (opcional)\n\n\
**💳 Métodos de pago aceptados:**\n\
• Efectivo • Tarjetas crédito/débito\n\
• Transferencia bancaria • Yape/Plin\n\n\
**🚚 Opciones de entrega:**\n\
• Recojo en tienda • Delivery express\n\
• Envío a provincia",
            "💰",
            "#F59E0B",
        ),
        Intent::Warranty => ChatReply::card(
            "Garantías y Políticas",
            "**✅ Nuestro Compromiso de Calidad:**\n\n\
**🛡️ Garantía en Autopartes:**\n\
• 6 meses a 1 año según el producto\n\
• Cobertura total por defectos de fabricación\n\
• Reemplazo inmediato en caso de fallas\n\n\
**📝 Política de Devoluciones:**\n\
• 30 días para devoluciones\n\
• Producto en perfecto estado\n\
• Embalaje original completo\n\n\
**🔧 Servicio de Instalación:**\n\
• Taller propio especializado\n\
• Técnicos certificados\n\
• Garantía en mano de obra",
            "🔧",
            "#06B6D4",
        ),
        Intent::Contact => ChatReply::card(
            "Contacto y Comunicación",
            "**📞 Atención Telefónica:**\n\
• Central: (01) 456-7890\n\
• Ventas: (01) 6200 158\n\
• Soporte Técnico: (01) 456-7892\n\n\
**📱 WhatsApp Business:**\n\
• +51 987 654 321 (Ventas)\n\
• +51 987 654 322 (Soporte)\n\n\
**✉️ Correos Electrónicos:**\n\
• General: info@autopartesvirtual.com\n\
• Ventas: ventas@autopartesvirtual.com\n\
• Soporte: soporte@autopartesvirtual.com\n\n\
**🌐 Redes Sociales:**\n\
• Facebook: /AutopartesVirtual\n\
• Instagram: @AutopartesVirtual\n\
• TikTok: @AutopartesVirtual",
            "📞",
            "#EC4899",
        ),
        Intent::Services => ChatReply::card(
            "Servicios Adicionales",
            "**🔧 SERVICIOS PROFESIONALES:**\n\n\
**🛠️ Instalación y Montaje:**\n\
• Instalación de autopartes\n\
• Diagnóstico computarizado\n\
• Mantenimiento preventivo\n\n\
**🚗 Asesoría Técnica:**\n\
• Asesoramiento especializado\n\
• Recomendaciones técnicas\n\
• Solución de problemas\n\n\
**📦 Logística y Entrega:**\n\
• Delivery express (2-4 horas)\n\
• Envíos a nivel nacional\n\
• Instalación a domicilio\n\n\
**🔄 Plan de Mantenimiento:**\n\
• Programas de mantenimiento\n\
• Recordatorios automáticos\n\
• Descuentos por fidelidad",
            "⚙️",
            "#84CC16",
        ),
        Intent::Shipping => ChatReply::card(
            "Envíos y Logística",
            "**🚚 SERVICIO DE DELIVERY:**\n\n\
**📦 Entrega Express:**\n\
• Lima Metropolitana: 2-4 horas\n\
• Provincias: 24-48 horas\n\
• Urgente: 1 hora (costo adicional)\n\n\
**💰 Costos de Envío:**\n\
• Lima: S/ 15 - S/ 25\n\
• Provincias: S/ 25 - S/ 50\n\
• *Envío GRATIS en compras mayores a S/ 500*\n\n\
**🏍️ Opciones de Entrega:**\n\
• Motocourier express\n\
• Courier especializado\n\
• Recojo en tienda (gratis)",
            "🚚",
            "#F97316",
        ),
        // Catalog intents only land here when called without a database.
        Intent::FullCatalog | Intent::Category(_) | Intent::Brand(_) | Intent::Unknown => {
            ChatReply::card(
                "No entendí tu pregunta",
                "Puedo ayudarte con información sobre:\n\n\
• 🚗 Catálogo completo de autopartes\n\
• 🛑 Sistema de frenos\n\
• 🔧 Motor y transmisión\n\
• 🔄 Suspensión y dirección\n\
• ⚡ Sistema eléctrico\n\
• 🛢️ Lubricantes y fluidos\n\
• 🏷️ Marcas específicas\n\
• 💰 Cotizaciones y precios\n\
• 💳 Métodos de pago\n\
• 📍 Ubicación y sucursales\n\
• 🔧 Garantías y políticas\n\n\
¿Sobre qué te gustaría consultar?",
                "🤔",
                "#6B7280",
            )
        }
    }
}

fn pick(options: &'static [&'static str]) -> &'static str {
    // Both pools are non-empty statics; the fallback only satisfies the type.
    options
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or("¡Hola!")
}

struct CatalogRow {
    name: String,
    models: Vec<String>,
    price: String,
    category: String,
    brand: String,
    serial_number: String,
    stock: i32,
    stock_class: &'static str,
}

impl From<&Product> for CatalogRow {
    fn from(product: &Product) -> Self {
        let mut models: Vec<String> = product.compatible_models.iter().take(2).cloned().collect();
        if product.compatible_models.len() > 2 {
            models.push(format!("+{} más", product.compatible_models.len() - 2));
        }
        Self {
            name: product.name.clone(),
            models,
            price: format_soles(product.price),
            category: product.category.clone(),
            brand: product.brand.clone(),
            serial_number: product.serial_number.clone().unwrap_or_default(),
            stock: product.stock,
            stock_class: product.stock_level().css_class(),
        }
    }
}

#[derive(Template)]
#[template(path = "chat/catalog_table.html")]
struct CatalogTableTemplate {
    rows: Vec<CatalogRow>,
}

pub fn render_catalog_table(products: &[Product]) -> AppResult<String> {
    let template = CatalogTableTemplate {
        rows: products.iter().map(CatalogRow::from).collect(),
    };
    Ok(template.render()?)
}

fn catalog_reply(
    title: &str,
    body: &str,
    icon: &str,
    color: &str,
    products: &[Product],
) -> AppResult<ChatReply> {
    Ok(ChatReply {
        kind: Some(ReplyKind::CatalogTable),
        table_html: Some(render_catalog_table(products)?),
        ..ChatReply::card(title, body, icon, color)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_wins_over_later_rules() {
        assert_eq!(classify("Hola, busco frenos"), Intent::Greeting);
        assert_eq!(classify("  BUENAS TARDES "), Intent::Greeting);
    }

    #[test]
    fn catalog_keywords_take_priority_over_schedule() {
        // "disponible" appears in both rule sets; the catalog comes first.
        assert_eq!(classify("¿qué tienen disponible?"), Intent::FullCatalog);
        assert_eq!(classify("lista de precios"), Intent::FullCatalog);
    }

    #[test]
    fn categories_map_to_catalog_names() {
        assert_eq!(
            classify("necesito pastillas"),
            Intent::Category(PartCategory::Brakes)
        );
        assert_eq!(
            classify("BATERÍA para yaris"),
            Intent::Category(PartCategory::Electrical)
        );
        assert_eq!(PartCategory::Suspension.catalog_name(), "Suspension");
    }

    #[test]
    fn brand_intent_carries_the_matched_brand() {
        assert_eq!(classify("algo de NGK"), Intent::Brand("ngk"));
        assert_eq!(classify("brembo o bosch"), Intent::Brand("bosch"));
    }

    #[test]
    fn informational_intents() {
        assert_eq!(classify("¿a qué hora abren?"), Intent::OpeningHours);
        assert_eq!(classify("ubicación de la tienda"), Intent::Location);
        assert_eq!(classify("formas de pago"), Intent::PaymentMethods);
        assert_eq!(classify("hacen envío a provincia"), Intent::Shipping);
        assert_eq!(classify("adiós"), Intent::Farewell);
        assert_eq!(classify("xyz"), Intent::Unknown);
    }

    #[test]
    fn greeting_reply_uses_a_known_greeting() {
        let reply = canned_reply(Intent::Greeting);
        assert_eq!(reply.title, "¡Hola!");
        assert_eq!(reply.icon, "👋");
        assert!(GREETINGS.contains(&reply.body.as_str()));
    }

    #[test]
    fn location_reply_requests_the_map() {
        assert!(canned_reply(Intent::Location).map);
        assert!(!canned_reply(Intent::Contact).map);
    }

    #[test]
    fn empty_catalog_renders_placeholder() {
        let html = render_catalog_table(&[]).unwrap();
        assert!(html.contains("No se encontraron productos"));
    }
}
