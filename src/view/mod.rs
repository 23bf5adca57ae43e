//! View rendering

mod comment_editor;
mod components;
mod rfc_detail;
mod rfc_list;
mod sidebar;

use opentui::OptimizedBuffer;

use crate::model::{Model, Screen};

pub use components::Rect;

/// Render the current model state to the buffer
pub fn view(model: &Model, buffer: &mut OptimizedBuffer) {
    // Clear with background color
    buffer.fill_rect(
        0,
        0,
        u32::from(model.width),
        u32::from(model.height),
        model.theme.background,
    );

    match model.screen {
        Screen::RfcList => rfc_list::view(model, buffer),
        Screen::RfcDetail => rfc_detail::view(model, buffer),
    }

    comment_editor::view(model, buffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::tests::comment;
    use crate::config::UiConfig;
    use crate::model::{Focus, RfcView};
    use crate::model::tests::detail;
    use crate::packer::BoxKey;
    use crate::update::after_render;

    fn detail_model() -> Model {
        let mut model = Model::new(120, 30, UiConfig::default());
        let view = RfcView::new(
            detail(
                "# Title\n\nFirst paragraph.\n\nSecond paragraph.\n",
                vec![comment(1, Some(3), "looks good"), comment(2, None, "overall fine")],
            ),
            model.document_width(),
            None,
        );
        model.active_key = Some(view.key.clone());
        model.rfc = Some(view);
        model.screen = Screen::RfcDetail;
        model.focus = Focus::Document;
        model
    }

    #[test]
    fn detail_render_records_anchors_and_boxes() {
        let mut model = detail_model();
        let mut buffer = OptimizedBuffer::new(u32::from(model.width), u32::from(model.height));

        view(&model, &mut buffer);
        {
            let mounted = model.mounted.borrow();
            assert_eq!(mounted.anchors.len(), 3);
            assert!(mounted.box_heights.contains_key(&BoxKey::Thread(3)));
        }

        assert!(after_render(&mut model));
        view(&model, &mut buffer);
        assert!(!after_render(&mut model));

        let rfc = model.rfc.as_ref().expect("open");
        let row = rfc.layout.anchor_row(3).expect("anchored") as i64;
        assert_eq!(rfc.line_offsets.get(3), Some(row));
        assert_eq!(rfc.placements.top_of(BoxKey::Thread(3)), Some(row));
    }

    #[test]
    fn thread_boxes_are_measured_from_rendered_markdown() {
        let mut model = detail_model();
        if let Some(rfc) = model.rfc.as_mut() {
            rfc.comments = crate::comments::CommentList::new(vec![comment(
                1,
                Some(3),
                "```\nlet a = 1;\nlet b = 2;\n```",
            )]);
        }
        let mut buffer = OptimizedBuffer::new(u32::from(model.width), u32::from(model.height));
        view(&model, &mut buffer);

        // Borders, the author row and the two code rows; no fence rows.
        let mounted = model.mounted.borrow();
        assert_eq!(mounted.box_heights.get(&BoxKey::Thread(3)), Some(&5));
    }

    #[test]
    fn list_and_modal_render_without_data() {
        let mut model = Model::new(60, 12, UiConfig::default());
        let mut buffer = OptimizedBuffer::new(60, 12);
        view(&model, &mut buffer);

        model = detail_model();
        if let Some(rfc) = model.rfc.as_mut() {
            rfc.interaction.open_general();
        }
        model.focus = Focus::GeneralComposer;
        let mut buffer = OptimizedBuffer::new(120, 30);
        view(&model, &mut buffer);
    }
}
