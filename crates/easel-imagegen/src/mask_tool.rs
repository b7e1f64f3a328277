//! Standalone mask synthesis tools

use easel_imaging::mask::{MAX_FEATHER, MAX_SIDE};
use easel_imaging::{Dimensions, MaskShape};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::schema::field::{self, FieldSpec};
use crate::schema::ValidationError;

const WIDTH: FieldSpec = FieldSpec::integer_unset("width", 1, MAX_SIDE)
    .required()
    .describe("Mask width, normally the target image's width");
const HEIGHT: FieldSpec = FieldSpec::integer_unset("height", 1, MAX_SIDE)
    .required()
    .describe("Mask height, normally the target image's height");
const FEATHER: FieldSpec = FieldSpec::integer("feather", 0, MAX_FEATHER, 0).describe("Edge blur radius in pixels");

const RECTANGLE_FIELDS: &[FieldSpec] = &[
    WIDTH,
    HEIGHT,
    FieldSpec::integer_unset("x", 0, MAX_SIDE).required().describe("Left edge of the rectangle"),
    FieldSpec::integer_unset("y", 0, MAX_SIDE).required().describe("Top edge of the rectangle"),
    FieldSpec::integer_unset("mask_width", 1, MAX_SIDE).required().describe("Rectangle width"),
    FieldSpec::integer_unset("mask_height", 1, MAX_SIDE).required().describe("Rectangle height"),
    FEATHER,
];
const ELLIPSE_FIELDS: &[FieldSpec] = &[
    WIDTH,
    HEIGHT,
    FieldSpec::integer_unset("center_x", 0, MAX_SIDE).required().describe("Horizontal center"),
    FieldSpec::integer_unset("center_y", 0, MAX_SIDE).required().describe("Vertical center"),
    FieldSpec::integer_unset("radius_x", 1, MAX_SIDE).required().describe("Horizontal radius"),
    FieldSpec::integer_unset("radius_y", 1, MAX_SIDE).required().describe("Vertical radius"),
    FEATHER,
];
const FULL_FIELDS: &[FieldSpec] = &[WIDTH, HEIGHT];

/// Tools that write a single-channel PNG mask without calling a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MaskTool {
    CreateRectangularMask,
    CreateEllipseMask,
    CreateFullMask,
}

impl MaskTool {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::CreateRectangularMask => RECTANGLE_FIELDS,
            Self::CreateEllipseMask => ELLIPSE_FIELDS,
            Self::CreateFullMask => FULL_FIELDS,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::CreateRectangularMask => {
                "Create a mask with a white rectangle on black, for inpaint_image or remove_object. \
                 The rectangle must fit inside the canvas."
            }
            Self::CreateEllipseMask => {
                "Create a mask with a white ellipse on black, for inpaint_image or remove_object. \
                 Parts of the ellipse outside the canvas are clipped."
            }
            Self::CreateFullMask => "Create an all-white mask that marks the whole image for editing.",
        }
    }

    /// Validate arguments into a shape and the canvas it is drawn on
    pub fn parse(self, args: &Map<String, Value>) -> Result<(MaskShape, Dimensions), ValidationError> {
        let mut fields = field::validate(self.fields(), args)?;
        let canvas = Dimensions::new(fields.integer("width")?, fields.integer("height")?);

        let shape = match self {
            Self::CreateRectangularMask => MaskShape::Rectangle {
                x: fields.integer("x")?,
                y: fields.integer("y")?,
                width: fields.integer("mask_width")?,
                height: fields.integer("mask_height")?,
                feather: fields.integer("feather")?,
            },
            Self::CreateEllipseMask => MaskShape::Ellipse {
                center_x: fields.integer("center_x")?,
                center_y: fields.integer("center_y")?,
                radius_x: fields.integer("radius_x")?,
                radius_y: fields.integer("radius_y")?,
                feather: fields.integer("feather")?,
            },
            Self::CreateFullMask => MaskShape::Full,
        };

        Ok((shape, canvas))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::tests::args;

    #[test]
    fn rectangle_arguments_parse() {
        let (shape, canvas) = MaskTool::CreateRectangularMask
            .parse(&args(json!({
                "width": 512, "height": 256, "x": 10, "y": 20, "mask_width": 100, "mask_height": 50,
            })))
            .unwrap();
        assert_eq!(canvas, Dimensions::new(512, 256));
        assert_eq!(
            shape,
            MaskShape::Rectangle {
                x: 10,
                y: 20,
                width: 100,
                height: 50,
                feather: 0
            }
        );
    }

    #[test]
    fn feather_is_capped() {
        let err = MaskTool::CreateEllipseMask
            .parse(&args(json!({
                "width": 64, "height": 64, "center_x": 32, "center_y": 32, "radius_x": 8, "radius_y": 8, "feather": 51,
            })))
            .unwrap_err();
        assert_eq!(err.violations[0].field, "feather");
    }

    #[test]
    fn ellipse_may_overhang_the_canvas() {
        let tool = MaskTool::CreateEllipseMask;
        assert!(!tool.description().contains("must fit"));

        let (shape, canvas) = tool
            .parse(&args(json!({
                "width": 64, "height": 64, "center_x": 60, "center_y": 60, "radius_x": 20, "radius_y": 20,
            })))
            .unwrap();
        let png = shape.render(canvas).unwrap();
        assert!(!png.is_empty());
    }

    #[test]
    fn full_mask_needs_only_a_canvas() {
        let (shape, canvas) = MaskTool::CreateFullMask
            .parse(&args(json!({ "width": 8, "height": 4 })))
            .unwrap();
        assert_eq!(shape, MaskShape::Full);
        assert_eq!(canvas.pixels(), 32);

        let err = MaskTool::CreateFullMask.parse(&args(json!({ "width": 0 }))).unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["width", "height"]);
    }
}
