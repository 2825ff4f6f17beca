// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ parser using pest

use crate::geometry::{Face, FaceVertex, Mesh, Position, TexCoord, Vec3, DEFAULT_GROUP};
use crate::utils::math::PARALLEL_EPSILON;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Parser)]
#[grammar = "io/obj.pest"]
struct ObjParser;

/// Errors raised while reading or writing OBJ data
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("OBJ syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("invalid number '{text}' at line {line}")]
    InvalidNumber { line: usize, text: String },

    #[error("{kind} index {index} out of range at line {line}")]
    IndexOutOfRange {
        line: usize,
        kind: &'static str,
        index: i64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn line_of(pair: &Pair<Rule>) -> usize {
    pair.as_span().start_pos().line_col().0
}

fn parse_number(pair: Pair<Rule>) -> Result<f64, ObjError> {
    pair.as_str().parse().map_err(|_| ObjError::InvalidNumber {
        line: line_of(&pair),
        text: pair.as_str().to_string(),
    })
}

/// Numbers of a statement, keyword pair skipped
fn numbers(pair: Pair<Rule>) -> Result<Vec<f64>, ObjError> {
    pair.into_inner()
        .filter(|inner| inner.as_rule() == Rule::number)
        .map(parse_number)
        .collect()
}

/// Trimmed name argument of a statement, if any
fn name_of(pair: Pair<Rule>) -> Option<String> {
    pair.into_inner()
        .find(|inner| inner.as_rule() == Rule::name)
        .map(|inner| inner.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Resolve a 1-based or negative (relative) OBJ index against `count`
fn resolve_index(
    pair: &Pair<Rule>,
    count: usize,
    kind: &'static str,
) -> Result<usize, ObjError> {
    let line = line_of(pair);
    let index: i64 = pair.as_str().parse().map_err(|_| ObjError::InvalidNumber {
        line,
        text: pair.as_str().to_string(),
    })?;

    let resolved = match index {
        i if i > 0 => Some(i - 1),
        i if i < 0 => i64::try_from(count).ok().map(|count| count + i),
        _ => None,
    };

    resolved
        .and_then(|value| usize::try_from(value).ok())
        .filter(|&value| value < count)
        .ok_or(ObjError::IndexOutOfRange { line, kind, index })
}

/// Incrementally built mesh plus reader state
struct MeshBuilder {
    mesh: Mesh,
    current_group: String,
}

impl MeshBuilder {
    fn new() -> Self {
        Self {
            mesh: Mesh::new(),
            current_group: DEFAULT_GROUP.to_string(),
        }
    }

    fn corner(&self, pair: Pair<Rule>) -> Result<FaceVertex, ObjError> {
        let mut corner = FaceVertex::new(0);
        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::position_ref => {
                    corner.position =
                        resolve_index(&part, self.mesh.positions.len(), "vertex")?;
                }
                Rule::texcoord_ref => {
                    corner.texcoord = Some(resolve_index(
                        &part,
                        self.mesh.texcoords.len(),
                        "texture coordinate",
                    )?);
                }
                Rule::normal_ref => {
                    corner.normal = Some(resolve_index(&part, self.mesh.normals.len(), "normal")?);
                }
                _ => {}
            }
        }
        Ok(corner)
    }

    fn statement(&mut self, pair: Pair<Rule>) -> Result<(), ObjError> {
        match pair.as_rule() {
            Rule::vertex => {
                let values = numbers(pair)?;
                self.mesh.positions.push(Position {
                    point: Vec3::new(values[0], values[1], values[2]),
                    w: values.get(3).copied(),
                });
            }
            Rule::texcoord => {
                let values = numbers(pair)?;
                self.mesh.texcoords.push(TexCoord {
                    u: values[0],
                    v: values[1],
                    w: values.get(2).copied(),
                });
            }
            Rule::normal => {
                let values = numbers(pair)?;
                let normal = Vec3::new(values[0], values[1], values[2]);
                self.mesh
                    .normals
                    .push(normal.try_normalize(PARALLEL_EPSILON).unwrap_or(normal));
            }
            Rule::face => {
                let corners = pair
                    .into_inner()
                    .filter(|inner| inner.as_rule() == Rule::corner)
                    .map(|inner| self.corner(inner))
                    .collect::<Result<Vec<_>, _>>()?;

                let group = self.mesh.group_index_or_insert(&self.current_group);
                // fan triangulation around the first corner
                for window in corners[1..].windows(2) {
                    self.mesh.groups[group]
                        .faces
                        .push(Face::new([corners[0], window[0], window[1]]));
                }
            }
            Rule::group | Rule::object => {
                self.current_group = name_of(pair).unwrap_or_else(|| DEFAULT_GROUP.to_string());
            }
            Rule::usemtl => {
                let material = name_of(pair);
                let group = self.mesh.group_index_or_insert(&self.current_group);
                self.mesh.groups[group].material = material;
            }
            Rule::mtllib => {
                if let Some(library) = name_of(pair) {
                    self.mesh.material_libraries.push(library);
                }
            }
            Rule::smoothing => {
                debug!(line = line_of(&pair), "ignoring smoothing group");
            }
            Rule::unknown => {
                warn!(line = line_of(&pair), "Unprocessed line: {}", pair.as_str().trim());
            }
            _ => {}
        }
        Ok(())
    }
}

/// Parse OBJ source text into a mesh
pub fn parse_obj(source: &str) -> Result<Mesh, ObjError> {
    let mut pairs = ObjParser::parse(Rule::obj, source).map_err(|error| {
        let line = match error.line_col {
            pest::error::LineColLocation::Pos((line, _)) => line,
            pest::error::LineColLocation::Span((line, _), _) => line,
        };
        ObjError::Syntax {
            line,
            message: error.variant.message().to_string(),
        }
    })?;

    let mut builder = MeshBuilder::new();
    if let Some(obj) = pairs.next() {
        for pair in obj.into_inner() {
            builder.statement(pair)?;
        }
    }

    // `usemtl` before any face can leave an empty default group behind
    builder
        .mesh
        .groups
        .retain(|group| !group.faces.is_empty() || group.name != DEFAULT_GROUP);

    Ok(builder.mesh)
}
