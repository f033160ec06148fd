use chrono::Utc;
use sea_orm::{ActiveValue::NotSet, EntityTrait, PaginatorTrait, Set};

use crate::{
    entity::products::{ActiveModel as ProductActive, Entity as Products},
    error::AppResult,
    state::AppState,
};

struct StarterProduct {
    code: &'static str,
    name: &'static str,
    brand: &'static str,
    models: &'static str,
    price: i64,
    stock: i32,
    description: &'static str,
    warranty: &'static str,
    category: &'static str,
    serial_number: &'static str,
}

const STARTER_CATALOG: &[StarterProduct] = &[
    StarterProduct {
        code: "FR-001",
        name: "Pastillas de Freno Delanteras Cerámicas",
        brand: "Bosch",
        models: "Toyota Corolla 2015-2020,Honda Civic 2016-2021",
        price: 18_000,
        stock: 15,
        description: "Pastillas cerámicas de alto rendimiento con baja emisión de polvo",
        warranty: "12 meses",
        category: "Frenos",
        serial_number: "BOS-0987-FR",
    },
    StarterProduct {
        code: "FR-002",
        name: "Disco de Freno Delantero Ventilado",
        brand: "Brembo",
        models: "Nissan Sentra 2014-2019,Hyundai Elantra 2015-2020",
        price: 32_000,
        stock: 8,
        description: "Disco ventilado con mejor disipación de calor",
        warranty: "18 meses",
        category: "Frenos",
        serial_number: "BRE-1234-FD",
    },
    StarterProduct {
        code: "FR-003",
        name: "Kit de Pastillas Traseras",
        brand: "ACDelco",
        models: "Chevrolet Aveo 2012-2018,Suzuki Swift 2010-2017",
        price: 15_000,
        stock: 12,
        description: "Kit de pastillas traseras con sensores de desgaste",
        warranty: "12 meses",
        category: "Frenos",
        serial_number: "ACD-5678-RT",
    },
    StarterProduct {
        code: "MO-001",
        name: "Filtro de Aceite Sintético",
        brand: "Mann-Filter",
        models: "VW Golf 2015-2020,Audi A3 2014-2019",
        price: 4_500,
        stock: 25,
        description: "Filtro de alta eficiencia para aceites sintéticos",
        warranty: "6 meses",
        category: "Motor",
        serial_number: "MAN-9012-OF",
    },
    StarterProduct {
        code: "MO-002",
        name: "Kit de Correa de Distribución",
        brand: "Gates",
        models: "Toyota Hilux 2015-2021,Ford Ranger 2016-2022",
        price: 42_000,
        stock: 6,
        description: "Correa, tensores y poleas de calidad premium",
        warranty: "24 meses",
        category: "Motor",
        serial_number: "GAT-3456-TK",
    },
    StarterProduct {
        code: "MO-003",
        name: "Bujías de Iridio",
        brand: "NGK",
        models: "BMW Serie 3 2012-2019,Mercedes-Benz Clase C 2013-2018",
        price: 28_000,
        stock: 18,
        description: "Bujías de iridio para mejor combustión y menor consumo",
        warranty: "12 meses",
        category: "Motor",
        serial_number: "NGK-7890-SP",
    },
    StarterProduct {
        code: "SU-001",
        name: "Amortiguador Delantero Gas",
        brand: "KYB",
        models: "Kia Rio 2011-2017,Hyundai Accent 2010-2017",
        price: 38_000,
        stock: 10,
        description: "Amortiguador a gas con confort superior",
        warranty: "18 meses",
        category: "Suspension",
        serial_number: "KYB-1122-SF",
    },
    StarterProduct {
        code: "SU-002",
        name: "Kit de Rotulas y Terminales",
        brand: "TRW",
        models: "Nissan Tiida 2007-2014,Renault Logan 2009-2015",
        price: 22_000,
        stock: 14,
        description: "Kit de dirección con rotulas y terminales",
        warranty: "12 meses",
        category: "Suspension",
        serial_number: "TRW-3344-ST",
    },
    StarterProduct {
        code: "EL-001",
        name: "Batería 12V 60Ah",
        brand: "ACDelco",
        models: "Toyota Yaris 2014-2020,Honda Fit 2013-2020",
        price: 48_000,
        stock: 9,
        description: "Batería libre de mantenimiento con alta capacidad de arranque",
        warranty: "24 meses",
        category: "Electrico",
        serial_number: "ACD-5566-BT",
    },
    StarterProduct {
        code: "EL-002",
        name: "Alternador 12V 90A",
        brand: "Denso",
        models: "Mitsubishi L200 2015-2021,Nissan NP300 2014-2020",
        price: 85_000,
        stock: 4,
        description: "Alternador reconstruido con instalación incluida",
        warranty: "12 meses",
        category: "Electrico",
        serial_number: "DEN-7788-AL",
    },
    StarterProduct {
        code: "AC-001",
        name: "Aceite Sintético 5W-30",
        brand: "Mobil",
        models: "Vehículos a gasolina 2010-2023",
        price: 18_000,
        stock: 30,
        description: "Aceite full sintético con protección superior del motor",
        warranty: "N/A",
        category: "Lubricantes",
        serial_number: "MOB-9900-SY",
    },
    StarterProduct {
        code: "AC-002",
        name: "Aceite Mineral 20W-50",
        brand: "Repsol",
        models: "Vehículos antiguos y motos",
        price: 9_500,
        stock: 22,
        description: "Aceite mineral para motores de alto kilometraje",
        warranty: "N/A",
        category: "Lubricantes",
        serial_number: "REP-8811-MN",
    },
];

/// Loads the starter catalog into an empty products table. Returns how many rows were added.
pub async fn seed_catalog_if_empty(state: &AppState) -> AppResult<usize> {
    if Products::find().count(&state.orm).await? > 0 {
        tracing::debug!("catalog already populated, skipping seed");
        return Ok(0);
    }

    let now = Utc::now();
    let rows = STARTER_CATALOG.iter().map(|p| ProductActive {
        id: NotSet,
        code: Set(p.code.to_string()),
        name: Set(p.name.to_string()),
        brand: Set(p.brand.to_string()),
        compatible_models: Set(Some(p.models.to_string())),
        price: Set(p.price),
        stock: Set(p.stock),
        description: Set(Some(p.description.to_string())),
        warranty: Set(Some(p.warranty.to_string())),
        category: Set(p.category.to_string()),
        serial_number: Set(Some(p.serial_number.to_string())),
        active: Set(true),
        created_at: Set(now),
    });
    Products::insert_many(rows).exec(&state.orm).await?;

    tracing::info!(count = STARTER_CATALOG.len(), "starter catalog seeded");
    Ok(STARTER_CATALOG.len())
}
