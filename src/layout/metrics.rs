//! Métricas de texto para Helvetica y Helvetica-Bold
//!
//! Anchos de glifo de las métricas AFM estándar (milésimas de em) para el
//! rango ASCII imprimible. Los caracteres acentuados del español comparten
//! ancho con su letra base en ambas variantes, así que se resuelven por
//! mapeo antes de consultar la tabla.

/// Anchos de Helvetica para los caracteres 32..=126
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, 1015, 667, 667, 722, 722,
    667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222,
    500, 222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334,
    584,
];

/// Anchos de Helvetica-Bold para los caracteres 32..=126
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, 556, 556, 556,
    556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, 975, 722, 722, 722, 722, 667,
    611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667,
    667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556,
    278, 889, 611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Letra base de un carácter acentuado del español
fn base_char(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' => 'a',
        'é' | 'è' | 'ë' => 'e',
        'í' | 'ì' | 'ï' => 'i',
        'ó' | 'ò' | 'ö' => 'o',
        'ú' | 'ù' | 'ü' => 'u',
        'ñ' => 'n',
        'Á' | 'À' | 'Ä' => 'A',
        'É' | 'È' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Ü' => 'U',
        'Ñ' => 'N',
        '¿' => '?',
        '¡' => '!',
        '•' => '*',
        '°' => 'o',
        _ => c,
    }
}

fn char_units(c: char, bold: bool) -> u16 {
    let c = base_char(c);
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let code = c as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize]
    } else {
        // Carácter fuera de tabla: ancho medio de caja
        556
    }
}

/// Ancho de un texto en puntos
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| char_units(c, bold) as u32).sum();
    units as f32 * size / 1000.0
}

/// Envuelve un texto en líneas que caben en `max_width` puntos
///
/// Respeta los saltos de línea del texto, corta por palabras y parte con
/// dureza las palabras que por sí solas exceden el ancho. Un texto vacío
/// produce una única línea vacía para que el bloque conserve su altura.
pub fn wrap_text(text: &str, max_width: f32, size: f32, bold: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, size, bold) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // La palabra sola puede seguir excediendo el ancho
            if text_width(word, size, bold) <= max_width {
                current = word.to_string();
            } else {
                let mut chunk = String::new();
                for c in word.chars() {
                    chunk.push(c);
                    if text_width(&chunk, size, bold) > max_width && chunk.chars().count() > 1 {
                        chunk.pop();
                        lines.push(std::mem::take(&mut chunk));
                        chunk.push(c);
                    }
                }
                current = chunk;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
