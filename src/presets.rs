//! Embedded preset rows
//!
//! A handful of DrawingML presets, enough to exercise every command kind and
//! both path-space conventions (box units and a declared nominal size).
//! Further rows are data: add a function and list it in [`all`].

use crate::preset::{HandleSource, PathSource, PresetSource};

/// Connection sites at the four edge midpoints, shared by most presets
fn edge_midpoints(src: PresetSource) -> PresetSource {
    src.connection("3cd4", "hc", "t")
        .connection("cd2", "l", "vc")
        .connection("cd4", "hc", "b")
        .connection("0", "r", "vc")
}

pub fn rect() -> PresetSource {
    edge_midpoints(PresetSource::new("rect"))
        .text_rect("l", "t", "r", "b")
        .path(
            PathSource::new()
                .move_to("l", "t")
                .line_to("r", "t")
                .line_to("r", "b")
                .line_to("l", "b")
                .close(),
        )
}

pub fn ellipse() -> PresetSource {
    PresetSource::new("ellipse")
        .guide("idx", "cos wd2 2700000")
        .guide("idy", "sin hd2 2700000")
        .guide("il", "+- hc 0 idx")
        .guide("ir", "+- hc idx 0")
        .guide("it", "+- vc 0 idy")
        .guide("ib", "+- vc idy 0")
        .connection("3cd4", "hc", "t")
        .connection("3cd4", "il", "it")
        .connection("cd2", "l", "vc")
        .connection("cd4", "il", "ib")
        .connection("cd4", "hc", "b")
        .connection("cd4", "ir", "ib")
        .connection("0", "r", "vc")
        .connection("3cd4", "ir", "it")
        .text_rect("il", "it", "ir", "ib")
        .path(
            PathSource::new()
                .move_to("l", "vc")
                .arc_to("wd2", "hd2", "cd2", "cd4")
                .arc_to("wd2", "hd2", "3cd4", "cd4")
                .arc_to("wd2", "hd2", "0", "cd4")
                .arc_to("wd2", "hd2", "cd4", "cd4")
                .close(),
        )
}

pub fn round_rect() -> PresetSource {
    edge_midpoints(
        PresetSource::new("roundRect")
            .adjust("adj", 16667.0)
            .guide("a", "pin 0 adj 50000")
            .guide("x1", "*/ ss a 100000")
            .guide("x2", "+- r 0 x1")
            .guide("y2", "+- b 0 x1")
            .guide("il", "*/ x1 29289 100000")
            .guide("ir", "+- r 0 il")
            .guide("ib", "+- b 0 il")
            .handle(HandleSource::xy("x1", "t").first_axis("adj", "0", "50000")),
    )
    .text_rect("il", "il", "ir", "ib")
    .path(
        PathSource::new()
            .move_to("l", "x1")
            .arc_to("x1", "x1", "cd2", "cd4")
            .line_to("x2", "t")
            .arc_to("x1", "x1", "3cd4", "cd4")
            .line_to("r", "y2")
            .arc_to("x1", "x1", "0", "cd4")
            .line_to("x1", "b")
            .arc_to("x1", "x1", "cd4", "cd4")
            .close(),
    )
}

pub fn triangle() -> PresetSource {
    PresetSource::new("triangle")
        .adjust("adj", 50000.0)
        .guide("a", "pin 0 adj 100000")
        .guide("x1", "*/ w a 200000")
        .guide("x2", "*/ w a 100000")
        .guide("x3", "+- x1 wd2 0")
        .handle(HandleSource::xy("x2", "t").first_axis("adj", "0", "100000"))
        .connection("3cd4", "x2", "t")
        .connection("cd2", "x1", "vc")
        .connection("cd4", "l", "b")
        .connection("cd4", "x2", "b")
        .connection("cd4", "r", "b")
        .connection("0", "x3", "vc")
        .text_rect("x1", "vc", "x3", "b")
        .path(
            PathSource::new()
                .move_to("l", "b")
                .line_to("x2", "t")
                .line_to("r", "b")
                .close(),
        )
}

pub fn diamond() -> PresetSource {
    edge_midpoints(
        PresetSource::new("diamond")
            .guide("ir", "*/ w 3 4")
            .guide("ib", "*/ h 3 4"),
    )
    .text_rect("wd4", "hd4", "ir", "ib")
    .path(
        PathSource::new()
            .move_to("l", "vc")
            .line_to("hc", "t")
            .line_to("r", "vc")
            .line_to("hc", "b")
            .close(),
    )
}

pub fn star4() -> PresetSource {
    edge_midpoints(
        PresetSource::new("star4")
            .adjust("adj", 12500.0)
            .guide("a", "pin 0 adj 50000")
            .guide("iwd2", "*/ wd2 a 50000")
            .guide("ihd2", "*/ hd2 a 50000")
            .guide("sdx", "cos iwd2 2700000")
            .guide("sdy", "sin ihd2 2700000")
            .guide("sx1", "+- hc 0 sdx")
            .guide("sx2", "+- hc sdx 0")
            .guide("sy1", "+- vc 0 sdy")
            .guide("sy2", "+- vc sdy 0")
            .guide("yAdj", "+- vc 0 ihd2")
            .handle(
                HandleSource::xy("hc", "yAdj")
                    .second_axis("adj", "0", "50000"),
            ),
    )
    .text_rect("sx1", "sy1", "sx2", "sy2")
    .path(
        PathSource::new()
            .move_to("l", "vc")
            .line_to("sx1", "sy1")
            .line_to("hc", "t")
            .line_to("sx2", "sy1")
            .line_to("r", "vc")
            .line_to("sx2", "sy2")
            .line_to("hc", "b")
            .line_to("sx1", "sy2")
            .close(),
    )
}

pub fn right_arrow() -> PresetSource {
    edge_midpoints(
        PresetSource::new("rightArrow")
            .adjust("adj1", 50000.0)
            .adjust("adj2", 50000.0)
            .guide("maxAdj2", "*/ 100000 w ss")
            .guide("a1", "pin 0 adj1 100000")
            .guide("a2", "pin 0 adj2 maxAdj2")
            .guide("dx1", "*/ ss a2 100000")
            .guide("x1", "+- r 0 dx1")
            .guide("dy1", "*/ h a1 200000")
            .guide("y1", "+- vc 0 dy1")
            .guide("y2", "+- vc dy1 0")
            .guide("dx2", "*/ y1 dx1 hd2")
            .guide("x2", "+- x1 dx2 0")
            .handle(
                HandleSource::xy("l", "y1")
                    .second_axis("adj1", "0", "100000"),
            )
            .handle(
                HandleSource::xy("x1", "t")
                    .first_axis("adj2", "0", "maxAdj2"),
            ),
    )
    .text_rect("l", "y1", "x2", "y2")
    .path(
        PathSource::new()
            .move_to("l", "y1")
            .line_to("x1", "y1")
            .line_to("x1", "t")
            .line_to("r", "vc")
            .line_to("x1", "b")
            .line_to("x1", "y2")
            .line_to("l", "y2")
            .close(),
    )
}

/// Authored on a 5×5 grid
pub fn flow_chart_punched_card() -> PresetSource {
    edge_midpoints(PresetSource::new("flowChartPunchedCard"))
        .text_rect("l", "hd5", "r", "b")
        .path(
            PathSource::new()
                .sized(5.0, 5.0)
                .move_to("0", "1")
                .line_to("1", "0")
                .line_to("5", "0")
                .line_to("5", "5")
                .line_to("0", "5")
                .close(),
        )
}

/// Authored on a 21600×21600 grid with a cubic wave along the bottom
pub fn flow_chart_document() -> PresetSource {
    PresetSource::new("flowChartDocument")
        .guide("y1", "*/ h 17322 21600")
        .guide("y2", "*/ h 20172 21600")
        .connection("3cd4", "hc", "t")
        .connection("cd2", "l", "vc")
        .connection("cd4", "hc", "y1")
        .connection("0", "r", "vc")
        .text_rect("l", "t", "r", "y2")
        .path(
            PathSource::new()
                .sized(21600.0, 21600.0)
                .move_to("0", "0")
                .line_to("21600", "0")
                .line_to("21600", "17322")
                .cubic_to(("10800", "17322"), ("10800", "23922"), ("0", "20172"))
                .close(),
        )
}

/// Every embedded row
pub fn all() -> Vec<PresetSource> {
    vec![
        rect(),
        ellipse(),
        round_rect(),
        triangle(),
        diamond(),
        star4(),
        right_arrow(),
        flow_chart_punched_card(),
        flow_chart_document(),
    ]
}
