//! Storage aggregation from a save's `items.xml`.
//!
//! Two placeable classes contribute to the totals:
//! - `SiloPlaceable`: `<storage><node fillType=".." fillLevel=".."/></storage>`
//! - `SellingStationPlaceable`: `<sellingStation><stats fillType=".." received=".."/></sellingStation>`
//!
//! Every other placeable is skipped.

use crate::fill_type::FillTypeMap;
use crate::save::SaveError;
use crate::totals::ResourceTotals;
use crate::xml::Element;
use std::path::Path;

/// Save-relative file holding the placed items
pub const ITEMS_FILE: &str = "items.xml";

/// Placeable classes that carry storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemClass {
    Silo,
    SellingStation,
    Other,
}

impl ItemClass {
    pub fn from_class_name(class_name: &str) -> Self {
        match class_name {
            "SiloPlaceable" => ItemClass::Silo,
            "SellingStationPlaceable" => ItemClass::SellingStation,
            _ => ItemClass::Other,
        }
    }
}

/// Read `items.xml` from a save folder and total its storage
///
/// Selling station fill types missing from `map` are added to it.
pub fn aggregate(save_folder: &Path, map: &mut FillTypeMap) -> Result<ResourceTotals, SaveError> {
    let doc = Element::read_file(&save_folder.join(ITEMS_FILE))?;
    let mut totals = ResourceTotals::new();
    accumulate(&doc, map, &mut totals)?;
    Ok(totals)
}

/// Add the storage of one parsed items document to `totals`
pub fn accumulate(
    doc: &Element,
    map: &mut FillTypeMap,
    totals: &mut ResourceTotals,
) -> Result<(), SaveError> {
    for item in doc.children("item") {
        match ItemClass::from_class_name(item.required_attr("className")?) {
            ItemClass::Silo => accumulate_silo(item, map, totals)?,
            ItemClass::SellingStation => accumulate_selling_station(item, map, totals)?,
            ItemClass::Other => {}
        }
    }
    Ok(())
}

fn accumulate_silo(
    item: &Element,
    map: &FillTypeMap,
    totals: &mut ResourceTotals,
) -> Result<(), SaveError> {
    for storage in item.children("storage") {
        for node in storage.children("node") {
            let name = node.required_attr("fillType")?;
            let level = node.parse_quantity("fillLevel")?;
            let code = map
                .code(name)
                .ok_or_else(|| SaveError::UnknownFillType(name.to_string()))?;
            totals.add(code, level);
        }
    }
    Ok(())
}

fn accumulate_selling_station(
    item: &Element,
    map: &mut FillTypeMap,
    totals: &mut ResourceTotals,
) -> Result<(), SaveError> {
    for station in item.children("sellingStation") {
        for stats in station.children("stats") {
            let name = stats.required_attr("fillType")?;
            let received = stats.parse_quantity("received")?;
            // Nothing sold yet; must not register the fill type
            if received <= 0.0 {
                continue;
            }
            let code = map.get_or_assign(name)?;
            totals.add(code, received);
        }
    }
    Ok(())
}
