use crate::entities::{Container, Item};
use crate::errors::PackError;
use crate::io::ext_repr::{ExtContainers, ExtItems};

/// Longest accepted external id.
pub const MAX_ID_LEN: usize = 64;

/// Converts the external id-keyed item map into internal items plus the id
/// table they index. Input order is preserved and becomes the base item
/// order.
pub fn import_items(ext: &ExtItems) -> Result<(Vec<Item>, Vec<String>), PackError> {
    if ext.is_empty() {
        return Err(PackError::Items("items missing".into()));
    }
    let mut items = Vec::with_capacity(ext.len());
    let mut ids = Vec::with_capacity(ext.len());
    for (idx, (id, dims)) in ext.iter().enumerate() {
        validate_id(id).map_err(PackError::Items)?;
        let width = validate_dim(dims.w)?;
        let length = validate_dim(dims.l)?;
        items.push(Item::new(idx, width, length));
        ids.push(id.clone());
    }
    Ok((items, ids))
}

/// Converts the external id-keyed container map into internal containers
/// plus the id table they index. Input order is the packing order.
pub fn import_containers(ext: &ExtContainers) -> Result<(Vec<Container>, Vec<String>), PackError> {
    if ext.is_empty() {
        return Err(PackError::Containers("containers missing".into()));
    }
    let mut containers = Vec::with_capacity(ext.len());
    let mut ids = Vec::with_capacity(ext.len());
    for (idx, (id, dims)) in ext.iter().enumerate() {
        validate_id(id).map_err(PackError::Containers)?;
        let width = validate_dim(dims.width)?;
        let length = validate_dim(dims.length)?;
        containers.push(Container::new(idx, width, length));
        ids.push(id.clone());
    }
    Ok((containers, ids))
}

fn validate_id(id: &str) -> Result<(), String> {
    if id.is_empty() {
        return Err("id must be a non-empty string".into());
    }
    if id.len() > MAX_ID_LEN {
        return Err(format!("id '{id}' exceeds {MAX_ID_LEN} characters"));
    }
    Ok(())
}

fn validate_dim(dim: u64) -> Result<usize, PackError> {
    if dim == 0 {
        return Err(PackError::Dimensions(
            "width and length must be positive integers".into(),
        ));
    }
    usize::try_from(dim)
        .map_err(|_| PackError::Dimensions(format!("dimension {dim} exceeds the supported range")))
}
