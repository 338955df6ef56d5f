//! Global style blocks injected at runtime.

use crate::host::{Host, NodeId};

/// Initial (pre-reveal) states for `[data-aos]` elements plus the load-in keyframes.
pub const ANIMATION_CSS: &str = r#"
    [data-aos] {
        opacity: 0;
        transition: all 0.6s ease-out;
    }

    [data-aos="fade-up"] {
        transform: translateY(30px);
    }

    [data-aos="fade-down"] {
        transform: translateY(-30px);
    }

    [data-aos="fade-left"] {
        transform: translateX(30px);
    }

    [data-aos="fade-right"] {
        transform: translateX(-30px);
    }

    [data-aos="zoom-in"] {
        transform: scale(0.8);
    }

    [data-aos="slide-up"] {
        transform: translateY(50px);
    }

    .aos-animate {
        opacity: 1 !important;
        transform: none !important;
    }

    .loading {
        opacity: 0;
        animation: fadeInUp 0.6s ease-out forwards;
    }

    @keyframes fadeInUp {
        from {
            opacity: 0;
            transform: translateY(30px);
        }
        to {
            opacity: 1;
            transform: translateY(0);
        }
    }
"#;

pub const RIPPLE_CSS: &str = r#"
    @keyframes ripple {
        to {
            transform: scale(4);
            opacity: 0;
        }
    }
"#;

pub const MODAL_CSS: &str = r#"
    .image-modal {
        position: fixed;
        top: 0;
        left: 0;
        width: 100%;
        height: 100%;
        z-index: 10000;
        animation: fadeIn 0.3s ease-out;
    }

    .modal-overlay {
        position: absolute;
        top: 0;
        left: 0;
        width: 100%;
        height: 100%;
        background: rgba(0, 0, 0, 0.9);
        display: flex;
        align-items: center;
        justify-content: center;
        padding: 20px;
    }

    .modal-content {
        position: relative;
        max-width: 90%;
        max-height: 90%;
    }

    .modal-content img {
        width: 100%;
        height: auto;
        border-radius: 8px;
        box-shadow: 0 10px 30px rgba(0, 0, 0, 0.5);
    }

    .modal-close {
        position: absolute;
        top: -40px;
        right: 0;
        color: white;
        font-size: 30px;
        cursor: pointer;
        transition: opacity 0.3s ease;
    }

    .modal-close:hover {
        opacity: 0.7;
    }

    @keyframes fadeIn {
        from { opacity: 0; }
        to { opacity: 1; }
    }

    @keyframes fadeOut {
        from { opacity: 1; }
        to { opacity: 0; }
    }
"#;

/// Append a `<style>` block to the document head. Returns the new node.
pub fn inject_style<H: Host + ?Sized>(host: &mut H, css: &str) -> Option<NodeId> {
    let head = host.head()?;
    let style = host.create_element("style")?;
    host.set_text(style, css);
    host.append_child(head, style);
    Some(style)
}

/// `translateX(<px>px)`, printing negative zero as `0`.
pub fn translate_x(px: f64) -> String {
    let px = if px == 0.0 { 0.0 } else { px };
    format!("translateX({px}px)")
}

/// `translateY(<px>px)`, printing negative zero as `0`.
pub fn translate_y(px: f64) -> String {
    let px = if px == 0.0 { 0.0 } else { px };
    format!("translateY({px}px)")
}
