use crate::schema::{ArraySchema, CellValNum, COORDS_FIELD};

use super::batch::{AttributeColumn, CellBatch};
use super::error::BufferError;
use super::views::{BufferSet, FieldBuffer};

/// Validate the attached buffers against the schema and assemble them
/// into an owned [`CellBatch`].
///
/// Every declared attribute and the coordinate pseudo-field must have a
/// buffer attached; all columns must describe the same number of cells;
/// variable-length offsets must be non-decreasing and in range. The
/// caller's buffers are only read, never written, and no durable write
/// happens before this function returns successfully.
pub fn build_batch(schema: &ArraySchema, buffers: &BufferSet<'_>) -> Result<CellBatch, BufferError> {
    let dim_num = schema.dim_num();

    let coords = match buffers.get(COORDS_FIELD) {
        Some(FieldBuffer::Coords(coords)) => *coords,
        Some(_) => {
            return Err(BufferError::SchemaMismatch {
                field: COORDS_FIELD.to_string(),
                reason: "coordinate field requires a coordinate buffer".to_string(),
            })
        }
        None => return Err(BufferError::IncompleteBufferSet(COORDS_FIELD.to_string())),
    };

    if coords.len() % dim_num != 0 {
        return Err(BufferError::SchemaMismatch {
            field: COORDS_FIELD.to_string(),
            reason: format!(
                "coordinate buffer holds {} values, not a multiple of {} dimensions",
                coords.len(),
                dim_num
            ),
        });
    }
    let cell_count = coords.len() / dim_num;

    for cell in 0..cell_count {
        let tuple = &coords[cell * dim_num..(cell + 1) * dim_num];
        if !schema.domain.contains(tuple) {
            return Err(BufferError::SchemaMismatch {
                field: COORDS_FIELD.to_string(),
                reason: format!("coordinates {:?} lie outside the array domain", tuple),
            });
        }
    }

    let mut columns = Vec::with_capacity(schema.attributes.len());
    for attr in &schema.attributes {
        let buffer = buffers
            .get(&attr.name)
            .ok_or_else(|| BufferError::IncompleteBufferSet(attr.name.clone()))?;

        let column = match (attr.cell_val_num, buffer) {
            (CellValNum::Fixed(_), FieldBuffer::Fixed(data)) => {
                // cell_size is Some for every fixed-length attribute
                let cell_size = attr.cell_size().unwrap_or(1);
                if data.len() % cell_size != 0 {
                    return Err(BufferError::SchemaMismatch {
                        field: attr.name.clone(),
                        reason: format!(
                            "buffer of {} bytes is not a multiple of the {}-byte cell size",
                            data.len(),
                            cell_size
                        ),
                    });
                }
                let actual = data.len() / cell_size;
                if actual != cell_count {
                    return Err(BufferError::CellCountMismatch {
                        field: attr.name.clone(),
                        expected: cell_count,
                        actual,
                    });
                }
                AttributeColumn::Fixed {
                    cell_size,
                    data: data.to_vec(),
                }
            }
            (CellValNum::Var, FieldBuffer::Var { offsets, values }) => {
                if offsets.len() != cell_count {
                    return Err(BufferError::CellCountMismatch {
                        field: attr.name.clone(),
                        expected: cell_count,
                        actual: offsets.len(),
                    });
                }
                validate_offsets(&attr.name, offsets, values.len())?;
                AttributeColumn::Var {
                    offsets: offsets.to_vec(),
                    values: values.to_vec(),
                }
            }
            // set_fixed / set_var already reject kind mismatches, but a
            // coords view under an attribute name must still fail closed
            _ => {
                return Err(BufferError::SchemaMismatch {
                    field: attr.name.clone(),
                    reason: "buffer kind does not match the attribute's cell value count"
                        .to_string(),
                })
            }
        };
        columns.push(column);
    }

    Ok(CellBatch::new(
        cell_count,
        dim_num,
        coords.to_vec(),
        columns,
    ))
}

/// Offsets must be non-decreasing and must not point past the end of the
/// values buffer; the first cell must start at offset zero.
fn validate_offsets(field: &str, offsets: &[u64], values_len: usize) -> Result<(), BufferError> {
    if let Some(&first) = offsets.first() {
        if first != 0 {
            return Err(BufferError::CorruptedOffsets {
                field: field.to_string(),
                reason: format!("first offset is {}, expected 0", first),
            });
        }
    }
    for pair in offsets.windows(2) {
        if pair[1] < pair[0] {
            return Err(BufferError::CorruptedOffsets {
                field: field.to_string(),
                reason: format!("offset {} follows {}", pair[1], pair[0]),
            });
        }
    }
    if let Some(&last) = offsets.last() {
        if last as usize > values_len {
            return Err(BufferError::CorruptedOffsets {
                field: field.to_string(),
                reason: format!(
                    "offset {} points past the {}-byte values buffer",
                    last, values_len
                ),
            });
        }
    }
    Ok(())
}
