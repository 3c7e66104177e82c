//! DrawingML element types
//!
//! Shape position and size (`<a:xfrm>` with its `<a:off>` and `<a:ext>`),
//! the non-visual drawing properties of a shape (`<p:cNvPr>`) and its
//! hyperlinks. Call [`register_default_classes`] once before parsing so
//! that parsed elements carry these classes.

use crate::define_element;
use crate::documents::Element;
use crate::error::Result;
use crate::registry::{oxml_element, register_element_cls};
use crate::simple_types::{
    StCoordinate, StDrawingElementId, StPositiveCoordinate, XsdBoolean, XsdInt, XsdString,
};
use crate::xmlchemy::ElementType;

define_element! {
    /// `<a:xfrm>`, the position, size, rotation and flip of a shape
    pub struct CtTransform2D: CtTransform2DExt = ("CT_Transform2D", "a:xfrm") {
        off: ZeroOrOne("a:off", successors = ["a:ext"]),
        ext: ZeroOrOne("a:ext", successors = []),
        rot: OptionalAttribute("rot", XsdInt, default = 0),
        flip_h: OptionalAttribute("flipH", XsdBoolean, default = false),
        flip_v: OptionalAttribute("flipV", XsdBoolean, default = false),
    }
    overrides {
        fn new_off(&self) -> Result<Element> {
            let mut off = oxml_element("a:off")?;
            off.set_x(0)?;
            off.set_y(0)?;
            Ok(off)
        }

        fn new_ext(&self) -> Result<Element> {
            let mut ext = oxml_element("a:ext")?;
            ext.set_cx(0)?;
            ext.set_cy(0)?;
            Ok(ext)
        }
    }
}

define_element! {
    /// `<a:off>`, a shape's offset from the top-left of its container
    pub struct CtPoint2D: CtPoint2DExt = ("CT_Point2D", "a:off") {
        x: RequiredAttribute("x", StCoordinate),
        y: RequiredAttribute("y", StCoordinate),
    }
}

define_element! {
    /// `<a:ext>`, a shape's width and height
    pub struct CtPositiveSize2D: CtPositiveSize2DExt = ("CT_PositiveSize2D", "a:ext") {
        cx: RequiredAttribute("cx", StPositiveCoordinate),
        cy: RequiredAttribute("cy", StPositiveCoordinate),
    }
}

define_element! {
    /// `<p:cNvPr>`, shape id, name and hyperlinks
    pub struct CtNonVisualDrawingProps: CtNonVisualDrawingPropsExt = (
        "CT_NonVisualDrawingProps",
        "p:cNvPr"
    ) {
        hlink_click: ZeroOrOne("a:hlinkClick", successors = ["a:hlinkHover", "a:extLst"]),
        hlink_hover: ZeroOrOne("a:hlinkHover", successors = ["a:extLst"]),
        id: RequiredAttribute("id", StDrawingElementId),
        name: RequiredAttribute("name", XsdString),
        descr: OptionalAttribute("descr", XsdString),
        hidden: OptionalAttribute("hidden", XsdBoolean, default = false),
    }
}

define_element! {
    /// `<a:hlinkClick>` and `<a:hlinkHover>`, a hyperlink on a shape
    pub struct CtHyperlink: CtHyperlinkExt = ("CT_Hyperlink", "a:hlinkClick") {
        r_id: OptionalAttribute("r:id", XsdString),
        action: OptionalAttribute("action", XsdString),
        tooltip: OptionalAttribute("tooltip", XsdString),
    }
}

/// Register the element classes of this module
///
/// Safe to call more than once.
pub fn register_default_classes() -> Result<()> {
    CtTransform2D::register()?;
    CtPoint2D::register()?;
    CtPositiveSize2D::register()?;
    CtNonVisualDrawingProps::register()?;
    CtHyperlink::register()?;
    register_element_cls("a:hlinkHover", CtHyperlink::class())?;
    tracing::debug!("drawing element classes registered");
    Ok(())
}
